//! The ordered event stream a resolution emits.
//!
//! The engine decides sequencing and final state; presentation layers
//! decide timing. Every board mutation during a resolution shows up
//! here, in order, so a renderer can replay the cascade as animation
//! and a persistence layer can audit outcomes.

use serde::{Deserialize, Serialize};

use crate::board::{Position, SpecialKind, Token, TokenId, TokenKind};

/// One step of a cascade, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeEvent {
    /// A match group's cells cleared (any promoted cell excluded).
    GroupCleared {
        kind: TokenKind,
        cells: Vec<Position>,
    },
    /// A cell's token was upgraded to a special instead of clearing.
    Promoted { position: Position, token: Token },
    /// A cleared special token fired, clearing further cells.
    ///
    /// `cleared` lists only cells this activation itself removed; chained
    /// specials it uncovers get their own events.
    SpecialActivated {
        position: Position,
        special: SpecialKind,
        cleared: Vec<Position>,
    },
    /// A token fell within its lane to fill a gap.
    TokenFell {
        id: TokenId,
        from: Position,
        to: Position,
    },
    /// A fresh token entered at the top of a lane.
    Spawned { position: Position, token: Token },
    /// Marker closing one detect-clear-activate-compact-spawn pass.
    /// Natural boundary for animation batching.
    PassEnded { pass: u32 },
}

impl CascadeEvent {
    /// Number of tokens this event removed from the board.
    #[must_use]
    pub fn cleared_count(&self) -> usize {
        match self {
            CascadeEvent::GroupCleared { cells, .. } => cells.len(),
            CascadeEvent::SpecialActivated { cleared, .. } => cleared.len(),
            _ => 0,
        }
    }
}
