//! Game session state.
//!
//! One session is one round-set of Star Match: a target star count, the
//! numbers still in play, the player's tentative picks, and a countdown.
//! Statuses are never stored; they are derived from the aggregate on every
//! query so they cannot drift from the underlying fields.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::{self, MathError};

/// Smallest playable number.
pub const MIN_NUMBER: u8 = 1;

/// Largest playable number, and the cap on any star count.
pub const MAX_NUMBER: u8 = 9;

/// Countdown length in seconds.
pub const STARTING_SECONDS: u8 = 10;

/// Derived game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Round in progress
    Active,
    /// Every number has been used
    Won,
    /// Countdown expired with numbers still in play
    Lost,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    /// Check if the session can still receive selections.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Check if the session is over (cannot change).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Derived per-number status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStatus {
    /// Removed by an earlier successful match
    Used,
    /// Tentatively selected, candidate sum still within the target
    Candidate,
    /// Tentatively selected, candidate sum exceeds the target
    Wrong,
    /// In play and not selected
    Available,
}

impl NumberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Used => "used",
            Self::Candidate => "candidate",
            Self::Wrong => "wrong",
            Self::Available => "available",
        }
    }
}

/// Serializable session snapshot for save/restore and clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub star_count: u8,
    pub available_numbers: Vec<u8>,
    pub candidate_numbers: Vec<u8>,
    pub seconds_left: u8,
}

/// Game session aggregate.
///
/// Mutated only by [`select_number`](GameSession::select_number) and
/// [`tick`](GameSession::tick); replaced wholesale on restart via
/// [`successor`](GameSession::successor).
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    /// Session generation, bumped on every restart. Timers captured against
    /// an older epoch are rejected, so a stale tick can never touch a
    /// superseded session.
    epoch: u64,

    /// Target sum for the current round, always in [1, 9]
    star_count: u8,

    /// Numbers not yet used, kept sorted ascending for stable display
    available_numbers: Vec<u8>,

    /// Tentative picks in selection order; subset of available, no duplicates
    candidate_numbers: Vec<u8>,

    /// Countdown; only ever decreases within one session
    seconds_left: u8,

    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl GameSession {
    /// Create a fresh session with a random star count.
    pub fn new() -> Self {
        Self::with_rng(&mut rand::thread_rng())
    }

    /// Create a fresh session using the given RNG.
    pub fn with_rng(rng: &mut impl Rng) -> Self {
        Self::at_epoch(0, rng)
    }

    /// Create the replacement session for "play again".
    ///
    /// The new session carries `epoch + 1`, invalidating any timer still
    /// holding the old epoch.
    pub fn successor(&self, rng: &mut impl Rng) -> Self {
        Self::at_epoch(self.epoch + 1, rng)
    }

    fn at_epoch(epoch: u64, rng: &mut impl Rng) -> Self {
        Self {
            epoch,
            star_count: math::random_int(MIN_NUMBER, MAX_NUMBER, rng),
            available_numbers: math::range(MIN_NUMBER, MAX_NUMBER),
            candidate_numbers: Vec::new(),
            seconds_left: STARTING_SECONDS,
            created_at: Utc::now(),
        }
    }

    /// Restore a session from a snapshot.
    ///
    /// The restored session starts a new epoch lineage at 0.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, SessionError> {
        let in_domain = |n: &u8| (MIN_NUMBER..=MAX_NUMBER).contains(n);

        let valid = (MIN_NUMBER..=MAX_NUMBER).contains(&snapshot.star_count)
            && snapshot.seconds_left <= STARTING_SECONDS
            && snapshot.available_numbers.iter().all(in_domain)
            && snapshot.available_numbers.windows(2).all(|w| w[0] < w[1])
            && snapshot
                .candidate_numbers
                .iter()
                .all(|n| snapshot.available_numbers.contains(n))
            && snapshot
                .candidate_numbers
                .iter()
                .enumerate()
                .all(|(i, n)| !snapshot.candidate_numbers[..i].contains(n));

        if !valid {
            return Err(SessionError::InvalidSnapshot);
        }

        Ok(Self {
            epoch: 0,
            star_count: snapshot.star_count,
            available_numbers: snapshot.available_numbers,
            candidate_numbers: snapshot.candidate_numbers,
            seconds_left: snapshot.seconds_left,
            created_at: Utc::now(),
        })
    }

    /// Capture a snapshot of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            star_count: self.star_count,
            available_numbers: self.available_numbers.clone(),
            candidate_numbers: self.candidate_numbers.clone(),
            seconds_left: self.seconds_left,
        }
    }

    /// Session generation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Current target sum.
    pub fn star_count(&self) -> u8 {
        self.star_count
    }

    /// Numbers still in play, ascending.
    pub fn available_numbers(&self) -> &[u8] {
        &self.available_numbers
    }

    /// Tentative picks in selection order.
    pub fn candidate_numbers(&self) -> &[u8] {
        &self.candidate_numbers
    }

    /// Seconds remaining on the countdown.
    pub fn seconds_left(&self) -> u8 {
        self.seconds_left
    }

    /// Check if the tentative picks overshoot the target.
    pub fn candidates_are_wrong(&self) -> bool {
        math::sum(&self.candidate_numbers) > u32::from(self.star_count)
    }

    /// Derive the game status.
    ///
    /// Won when no numbers remain, else lost when the countdown hit zero,
    /// else active. Pure function of the aggregate.
    pub fn derive_status(&self) -> GameStatus {
        if self.available_numbers.is_empty() {
            GameStatus::Won
        } else if self.seconds_left == 0 {
            GameStatus::Lost
        } else {
            GameStatus::Active
        }
    }

    /// Derive the status of a single number.
    pub fn number_status(&self, number: u8) -> NumberStatus {
        if !self.available_numbers.contains(&number) {
            return NumberStatus::Used;
        }
        if self.candidate_numbers.contains(&number) {
            if self.candidates_are_wrong() {
                NumberStatus::Wrong
            } else {
                NumberStatus::Candidate
            }
        } else {
            NumberStatus::Available
        }
    }

    /// Advance the countdown by one second.
    ///
    /// No-op once the countdown is exhausted or the session is won, so a
    /// tick arriving after the game is decided changes nothing.
    pub fn tick(&mut self) {
        if self.seconds_left > 0 && !self.available_numbers.is_empty() {
            self.seconds_left -= 1;
        }
    }

    /// Toggle a number in the candidate set and run the match check.
    ///
    /// No-op unless the session is active and `current_status` (as shown to
    /// the player when they acted) is not [`NumberStatus::Used`]. A number
    /// already among the candidates is deselected; an available number is
    /// appended. When the candidate sum equals the star count, the
    /// candidates leave play, the selection resets, and a new achievable
    /// star count is drawn for the remaining numbers.
    pub fn select_number(
        &mut self,
        number: u8,
        current_status: NumberStatus,
        rng: &mut impl Rng,
    ) -> Result<(), SessionError> {
        if !self.derive_status().is_active() || current_status == NumberStatus::Used {
            return Ok(());
        }

        if let Some(pos) = self.candidate_numbers.iter().position(|&n| n == number) {
            self.candidate_numbers.remove(pos);
        } else if self.available_numbers.contains(&number) {
            self.candidate_numbers.push(number);
        } else {
            // Not in play and not selected; nothing to toggle.
            return Ok(());
        }

        self.check_match(rng)
    }

    /// Apply the match rule after a candidate change.
    fn check_match(&mut self, rng: &mut impl Rng) -> Result<(), SessionError> {
        if math::sum(&self.candidate_numbers) != u32::from(self.star_count) {
            return Ok(());
        }

        self.available_numbers
            .retain(|n| !self.candidate_numbers.contains(n));
        self.candidate_numbers.clear();

        // An empty board is the won state; there is no next round to draw
        // a star count for.
        if !self.available_numbers.is_empty() {
            self.star_count = math::random_sum_in(&self.available_numbers, MAX_NUMBER, rng)?;
        }

        Ok(())
    }

    /// Convert full session state to a JSON snapshot for clients.
    pub fn to_json(&self) -> serde_json::Value {
        let numbers: Vec<serde_json::Value> = math::range(MIN_NUMBER, MAX_NUMBER)
            .into_iter()
            .map(|n| {
                serde_json::json!({
                    "number": n,
                    "status": self.number_status(n).as_str()
                })
            })
            .collect();

        serde_json::json!({
            "star_count": self.star_count,
            "available_numbers": self.available_numbers.clone(),
            "candidate_numbers": self.candidate_numbers.clone(),
            "seconds_left": self.seconds_left,
            "status": self.derive_status().as_str(),
            "numbers": numbers
        })
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Session errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// No achievable star count remains below the cap. Unreachable with the
    /// fixed 1-9 domain, but defined rather than left to panic.
    EmptyCandidatePool,
    /// Snapshot fields violate a session invariant.
    InvalidSnapshot,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCandidatePool => {
                write!(f, "No achievable star count for the remaining numbers")
            }
            Self::InvalidSnapshot => write!(f, "Snapshot violates session invariants"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<MathError> for SessionError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::EmptyCandidatePool => Self::EmptyCandidatePool,
        }
    }
}
