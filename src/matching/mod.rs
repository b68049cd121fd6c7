//! Match detection: runs, groups, and the board scan.
//!
//! ## Key Types
//!
//! - `Run`: a maximal straight line of 3+ equal-kind tokens
//! - `MatchGroup`: the union of overlapping runs, resolved as one event
//! - `find_matches`: the pure scan over a board snapshot
//!
//! Detection is deterministic: groups come back sorted row-major by
//! their topmost-leftmost cell, and rescanning an unchanged board
//! returns the identical grouping.

pub mod finder;

pub use finder::{find_matches, MatchGroup, Run};
