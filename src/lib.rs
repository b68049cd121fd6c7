//! # match3-engine
//!
//! A match-3 puzzle board engine: board state, match detection,
//! gravity/cascade resolution, and special-token rules.
//!
//! ## Design Principles
//!
//! 1. **Presentation-Agnostic**: The core decides sequencing and final
//!    state only. Rendering, animation timing, input gestures, audio,
//!    and persistence are external collaborators fed by the event
//!    stream.
//!
//! 2. **Deterministic**: Spawn randomness comes from an injectable
//!    seeded RNG. Same level, seed, and swaps reproduce the identical
//!    cascade, event for event.
//!
//! 3. **Value Semantics**: Tokens are plain values with lightweight
//!    tracing IDs; the board owns them outright. No shared mutable
//!    state exists outside one `GameSession`.
//!
//! ## Architecture
//!
//! Input flows `GameSession::try_swap` -> board mutation ->
//! `CascadeEngine::resolve` -> ordered `CascadeEvent` stream ->
//! `GoalTracker` -> outcome snapshot. A resolution loops
//! detect / clear / activate / compact / spawn until the board is
//! stable; re-entrant resolutions are rejected, not queued.
//!
//! ## Modules
//!
//! - `board`: grid, cells, token identity
//! - `matching`: run scanning and match-group union
//! - `specials`: promotion decisions and activation footprints
//! - `cascade`: the resolution state machine and its event stream
//! - `level`: static level configuration and the built-in catalog
//! - `session`: swap control, goal tracking, outcome reporting
//! - `core`: deterministic spawn RNG

pub mod board;
pub mod cascade;
pub mod core;
pub mod level;
pub mod matching;
pub mod session;
pub mod specials;

// Re-export commonly used types
pub use crate::board::{
    Board, CellContent, Lane, Orientation, Position, SpecialCategory, SpecialKind, Token, TokenId,
    TokenIds, TokenKind,
};

pub use crate::core::{SpawnRng, SpawnRngState};

pub use crate::matching::{find_matches, MatchGroup, Run};

pub use crate::specials::{activation_targets, classify, Promotion};

pub use crate::cascade::{
    CascadeEngine, CascadeEvent, EngineBusy, EngineState, Resolution, SwapTrigger,
};

pub use crate::level::{Level, LevelBuilder};

pub use crate::session::{
    CompletionReport, GameSession, GoalTracker, Outcome, SessionSnapshot, SwapRejection,
    SwapResult, POINTS_PER_TOKEN,
};
