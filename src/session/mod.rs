//! Game sessions: swap control, goal tracking, and outcome reporting.
//!
//! ## Key Types
//!
//! - `GameSession`: the mutable aggregate for one level attempt
//! - `SwapResult` / `SwapRejection`: the input contract for collaborators
//! - `GoalTracker` / `Outcome`: score, counters, and the win/loss call
//! - `SessionSnapshot` / `CompletionReport`: the output contract

pub mod game;
pub mod goals;
pub mod snapshot;

pub use game::{GameSession, SwapRejection, SwapResult};
pub use goals::{GoalTracker, Outcome, POINTS_PER_TOKEN};
pub use snapshot::{CompletionReport, SessionSnapshot};
