//! Cascade resolution: the pass loop and its event stream.
//!
//! ## Key Types
//!
//! - `CascadeEngine`: the `Idle -> Resolving -> Idle` state machine
//! - `SwapTrigger`: anchor/reference context from the triggering swap
//! - `Resolution`: events plus pass/clear totals for one resolution
//! - `CascadeEvent`: the ordered stream presentation layers replay
//! - `EngineBusy`: recoverable rejection of re-entrant resolutions

pub mod engine;
pub mod event;

pub use engine::{CascadeEngine, EngineBusy, EngineState, Resolution, SwapTrigger};
pub use event::CascadeEvent;
