//! Countdown timer for the active session.
//!
//! The host owns exactly one [`TickTimer`] per session and polls it with
//! the current time; the timer is the only path through which time mutates
//! a session. Deadlines are stored as `chrono` timestamps and compared
//! against a caller-supplied `now`, so tests never sleep.
//!
//! Stale handles are rejected by epoch: a timer started for one session can
//! never decrement the countdown of its replacement. The timer re-arms
//! itself only after it has applied a tick, and cancels itself as soon as
//! the session turns terminal, so at most one tick is ever pending.

use chrono::{DateTime, Duration, Utc};

use super::session::GameSession;

/// Seconds between countdown ticks.
pub const TICK_INTERVAL_SECONDS: i64 = 1;

/// Cancelable tick source scoped to one session.
#[derive(Debug, Clone)]
pub struct TickTimer {
    /// Epoch of the session this timer was started for
    epoch: u64,
    /// When the next tick is due
    deadline: DateTime<Utc>,
    cancelled: bool,
}

impl TickTimer {
    /// Start a timer for the given session, first tick due one interval
    /// from `now`.
    ///
    /// A timer started for an already-decided session begins cancelled.
    pub fn start(session: &GameSession, now: DateTime<Utc>) -> Self {
        Self {
            epoch: session.epoch(),
            deadline: now + Duration::seconds(TICK_INTERVAL_SECONDS),
            cancelled: !session.derive_status().is_active(),
        }
    }

    /// Epoch of the session this timer belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Check if the timer has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Check if a tick is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.cancelled && now >= self.deadline
    }

    /// Cancel the timer. Idempotent.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Apply a due tick to the session, returning whether a tick fired.
    ///
    /// A handle whose epoch no longer matches the session self-cancels
    /// without touching it. After a tick the timer re-arms one interval
    /// from `now` while the session stays active, and cancels itself once
    /// the session is decided.
    pub fn fire(&mut self, session: &mut GameSession, now: DateTime<Utc>) -> bool {
        if self.cancelled {
            return false;
        }
        if self.epoch != session.epoch() {
            self.cancelled = true;
            return false;
        }
        if now < self.deadline {
            return false;
        }

        session.tick();

        if session.derive_status().is_active() {
            self.deadline = now + Duration::seconds(TICK_INTERVAL_SECONDS);
        } else {
            self.cancelled = true;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math;
    use crate::state::session::{GameStatus, SessionSnapshot, STARTING_SECONDS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn active_session(seconds_left: u8) -> GameSession {
        GameSession::from_snapshot(SessionSnapshot {
            star_count: 5,
            available_numbers: math::range(1, 9),
            candidate_numbers: vec![],
            seconds_left,
        })
        .unwrap()
    }

    #[test]
    fn test_fires_once_per_interval() {
        let mut session = active_session(STARTING_SECONDS);
        let start = Utc::now();
        let mut timer = TickTimer::start(&session, start);

        // Not due yet
        assert!(!timer.fire(&mut session, start));
        assert_eq!(session.seconds_left(), STARTING_SECONDS);

        // Due exactly at the deadline
        let t1 = start + Duration::seconds(1);
        assert!(timer.fire(&mut session, t1));
        assert_eq!(session.seconds_left(), STARTING_SECONDS - 1);

        // Re-armed: not due again until another interval passes
        assert!(!timer.fire(&mut session, t1));
        let t2 = t1 + Duration::seconds(1);
        assert!(timer.fire(&mut session, t2));
        assert_eq!(session.seconds_left(), STARTING_SECONDS - 2);
    }

    #[test]
    fn test_cancels_when_countdown_expires() {
        let mut session = active_session(1);
        let start = Utc::now();
        let mut timer = TickTimer::start(&session, start);

        assert!(timer.fire(&mut session, start + Duration::seconds(1)));
        assert_eq!(session.seconds_left(), 0);
        assert_eq!(session.derive_status(), GameStatus::Lost);
        assert!(timer.is_cancelled());

        // No further ticks fire
        assert!(!timer.fire(&mut session, start + Duration::seconds(10)));
        assert_eq!(session.seconds_left(), 0);
    }

    #[test]
    fn test_stale_epoch_is_rejected() {
        let mut r = rng();
        let session = active_session(STARTING_SECONDS);
        let start = Utc::now();
        let mut timer = TickTimer::start(&session, start);

        // Session replaced; old timer handle is now stale.
        let mut replacement = session.successor(&mut r);
        assert!(!timer.fire(&mut replacement, start + Duration::seconds(5)));
        assert!(timer.is_cancelled());
        assert_eq!(replacement.seconds_left(), STARTING_SECONDS);
    }

    #[test]
    fn test_start_on_decided_session_is_cancelled() {
        let mut session = active_session(1);
        session.tick();
        assert_eq!(session.derive_status(), GameStatus::Lost);

        let timer = TickTimer::start(&session, Utc::now());
        assert!(timer.is_cancelled());
    }

    #[test]
    fn test_manual_cancel() {
        let mut session = active_session(STARTING_SECONDS);
        let start = Utc::now();
        let mut timer = TickTimer::start(&session, start);

        timer.cancel();
        assert!(!timer.fire(&mut session, start + Duration::seconds(2)));
        assert_eq!(session.seconds_left(), STARTING_SECONDS);
    }
}
