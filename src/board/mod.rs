//! Board data model: grid, cells, and token identity.
//!
//! ## Key Types
//!
//! - `TokenKind`: the six ordinary colors (matching identity)
//! - `SpecialKind` / `SpecialCategory`: special powers and goal categories
//! - `Token` / `TokenId` / `TokenIds`: token values and tracing IDs
//! - `Position` / `CellContent` / `Lane`: grid coordinates and contents
//! - `Board`: the grid itself, with pure mutation primitives
//!
//! The board layer is deliberately dumb: matching lives in `matching`,
//! special-token rules in `specials`, sequencing in `cascade`.

pub mod grid;
pub mod token;

pub use grid::{Board, CellContent, Lane, Position};
pub use token::{Orientation, SpecialCategory, SpecialKind, Token, TokenId, TokenIds, TokenKind};
