//! State management module for Star Match.
//!
//! This module provides the core state types:
//!
//! - `session` - Game session aggregate and transition rules
//! - `timer` - Cancelable per-session countdown tick source
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       StarMatch                           │
//! │                                                           │
//! │  ┌──────────────────────┐     ┌──────────────────────┐    │
//! │  │     GameSession      │     │      TickTimer       │    │
//! │  │                      │     │                      │    │
//! │  │ star_count           │◀────│ fire(now)            │    │
//! │  │ available_numbers    │     │   epoch guard        │    │
//! │  │ candidate_numbers    │     │   deadline (chrono)  │    │
//! │  │ seconds_left         │     │   self-cancel        │    │
//! │  └──────────┬───────────┘     └──────────────────────┘    │
//! │             │ derived, never stored                       │
//! │             ▼                                             │
//! │   derive_status() ∈ {active, won, lost}                   │
//! │   number_status(n) ∈ {used, candidate, wrong, available}  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use starmatch_state::state::{GameSession, TickTimer};
//! use chrono::Utc;
//!
//! let mut session = GameSession::new();
//! let mut timer = TickTimer::start(&session, Utc::now());
//!
//! // Player picks a number
//! let status = session.number_status(3);
//! session.select_number(3, status, &mut rand::thread_rng())?;
//!
//! // Host loop drives the countdown
//! timer.fire(&mut session, Utc::now());
//! ```

pub mod session;
pub mod timer;

// Re-export commonly used types
pub use session::{
    GameSession, GameStatus, NumberStatus, SessionError, SessionSnapshot, MAX_NUMBER, MIN_NUMBER,
    STARTING_SECONDS,
};
pub use timer::{TickTimer, TICK_INTERVAL_SECONDS};

use chrono::{DateTime, Utc};

/// Combined game driver.
///
/// This is an optional convenience struct that pairs a session with its
/// timer and keeps the two in step across restarts. Hosts that want
/// deterministic randomness use [`GameSession`] and [`TickTimer`] directly.
#[derive(Debug)]
pub struct StarMatch {
    session: GameSession,
    timer: TickTimer,
}

impl StarMatch {
    /// Start a new game.
    pub fn new() -> Self {
        let session = GameSession::new();
        let timer = TickTimer::start(&session, Utc::now());
        Self { session, timer }
    }

    /// Play again: replace the session wholesale and start a fresh timer.
    ///
    /// The old timer is cancelled, and the epoch bump invalidates any clone
    /// of its handle still held elsewhere.
    pub fn restart(&mut self) {
        self.timer.cancel();
        self.session = self.session.successor(&mut rand::thread_rng());
        self.timer = TickTimer::start(&self.session, Utc::now());
    }

    /// Drive the countdown; call once per host loop iteration.
    ///
    /// Returns whether a tick fired.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        self.timer.fire(&mut self.session, now)
    }

    /// Handle a player tapping `number`.
    pub fn select(&mut self, number: u8) -> Result<(), SessionError> {
        let status = self.session.number_status(number);
        self.session
            .select_number(number, status, &mut rand::thread_rng())
    }

    /// The underlying session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Derived game status.
    pub fn status(&self) -> GameStatus {
        self.session.derive_status()
    }

    /// Derived status of one number.
    pub fn number_status(&self, number: u8) -> NumberStatus {
        self.session.number_status(number)
    }

    /// Current target sum.
    pub fn star_count(&self) -> u8 {
        self.session.star_count()
    }

    /// Seconds remaining.
    pub fn seconds_left(&self) -> u8 {
        self.session.seconds_left()
    }

    /// Full JSON snapshot for clients.
    pub fn to_json(&self) -> serde_json::Value {
        self.session.to_json()
    }
}

impl Default for StarMatch {
    fn default() -> Self {
        Self::new()
    }
}
