//! Star Match State Library
//!
//! This crate provides state management for the Star Match puzzle game: a
//! number of stars is shown and the player must pick numbers from 1 to 9
//! whose sum equals the star count, before a ten second countdown expires
//! or every number has been used.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - **Math Helpers** - Pure numeric functions: summation, inclusive ranges,
//!   inclusive random picks, and the weighted subset-sum draw that chooses
//!   each round's star count.
//!
//! - **Game Session** - The single mutable aggregate (star count, available
//!   numbers, candidate selection, countdown) with its transition rules and
//!   derived statuses.
//!
//! - **Tick Timer** - A cancelable, epoch-guarded countdown driver scoped to
//!   one session, so a stale timer can never mutate a superseded session.
//!
//! # Design Principles
//!
//! 1. **Derived state is never stored** - Game status and per-number status
//!    are recomputed from the aggregate on every query, so they cannot
//!    drift from the underlying fields.
//!
//! 2. **Terminal states are frozen** - Once the game is won or lost,
//!    selections and ticks are no-ops.
//!
//! 3. **No rendering** - This crate is pure state; presentation reads the
//!    derived statuses and drives the timer from its own loop.
//!
//! 4. **Serialization-ready** - Sessions convert to JSON for clients and
//!    round-trip through a validated snapshot type.
//!
//! # Example
//!
//! ```rust
//! use starmatch_state::state::{GameSession, NumberStatus, TickTimer};
//! use chrono::Utc;
//!
//! let mut session = GameSession::new();
//! let mut timer = TickTimer::start(&session, Utc::now());
//!
//! // Player taps a number
//! let status = session.number_status(3);
//! session
//!     .select_number(3, status, &mut rand::thread_rng())
//!     .unwrap();
//!
//! // Host loop drives the countdown once per second
//! timer.fire(&mut session, Utc::now());
//!
//! // Presentation reads derived state
//! let _ = session.derive_status();
//! let _ = session.number_status(3);
//! ```

pub mod math;
pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
