//! Promotion and activation rules for special tokens.
//!
//! ## Promotion
//!
//! When a match group clears, one cell may be promoted instead:
//!
//! - size 3: nothing, all cells clear
//! - size 4 (straight): striped, oriented along the producing run
//! - L/T of two length-3 runs: wrapped at the shared cell
//! - size 5+: color bomb at the anchor
//!
//! Shape is checked before raw size: the L/T case has five cells but
//! yields a wrapped token, not a color bomb.
//!
//! ## Activation
//!
//! A special token that gets cleared fires. Striped clears its fixed row
//! or column, wrapped the surrounding 3x3 (clipped, blocked cells
//! skipped), a color bomb every token of the reference kind. The cascade
//! engine owns the recursive chaining; this module only answers "which
//! cells does one activation hit".

use serde::{Deserialize, Serialize};

use crate::board::{Board, Orientation, Position, SpecialKind, Token, TokenKind};
use crate::matching::{MatchGroup, Run};

/// What a clearing match group promotes, if anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Promotion {
    /// Plain match: every cell clears.
    None,
    /// `position` keeps its token, upgraded to `special`; the rest clear.
    Promote {
        position: Position,
        special: SpecialKind,
    },
}

/// Decide the promotion for a match group.
///
/// `anchor` is the cell where the triggering swap landed, when known; it
/// wins the promoted spot if it lies inside the group, otherwise the
/// group's topmost-leftmost cell does. The wrapped shape ignores the
/// anchor entirely: the run intersection is the only sensible home for
/// a wrapped token.
#[must_use]
pub fn classify(group: &MatchGroup, anchor: Option<Position>) -> Promotion {
    if let Some(shared) = wrapped_intersection(group) {
        return Promotion::Promote {
            position: shared,
            special: SpecialKind::Wrapped,
        };
    }

    let position = anchor
        .filter(|&a| group.contains(a))
        .unwrap_or_else(|| group.origin());

    match group.len() {
        0..=3 => Promotion::None,
        4 => Promotion::Promote {
            position,
            // A 4-cell group is always a single straight run: overlapping
            // perpendicular runs union to at least 5 cells.
            special: SpecialKind::Striped(group.runs[0].orientation),
        },
        _ => Promotion::Promote {
            position,
            special: SpecialKind::ColorBomb,
        },
    }
}

/// The shared cell of an L/T made of exactly two length-3 runs.
fn wrapped_intersection(group: &MatchGroup) -> Option<Position> {
    let runs: &[Run; 2] = group.runs.as_slice().try_into().ok()?;
    let (a, b) = (&runs[0], &runs[1]);
    if a.len() != 3 || b.len() != 3 || a.orientation == b.orientation {
        return None;
    }

    let mut shared = a.cells.iter().copied().filter(|&c| b.contains(c));
    let first = shared.next()?;
    match shared.next() {
        None => Some(first),
        Some(_) => None,
    }
}

/// Cells one activation clears, given the board as it stands.
///
/// The activating token has already been cleared from `pos`; cells that
/// are empty by the time the engine processes the result are no-ops.
/// `reference_kind` drives color bombs (the swap partner's kind for a
/// direct swap, `None` for passive activation, which falls back to the
/// bomb's own kind).
#[must_use]
pub fn activation_targets(
    board: &Board,
    pos: Position,
    token: Token,
    reference_kind: Option<TokenKind>,
) -> Vec<Position> {
    match token.special {
        SpecialKind::None => Vec::new(),

        SpecialKind::Striped(Orientation::Row) => (0..board.cols())
            .map(|col| Position::new(pos.row, col))
            .filter(|&p| board.token_at(p).is_some())
            .collect(),

        SpecialKind::Striped(Orientation::Column) => (0..board.rows())
            .map(|row| Position::new(row, pos.col))
            .filter(|&p| board.token_at(p).is_some())
            .collect(),

        SpecialKind::Wrapped => {
            let top = pos.row.saturating_sub(1);
            let left = pos.col.saturating_sub(1);
            let bottom = (pos.row + 1).min(board.rows() - 1);
            let right = (pos.col + 1).min(board.cols() - 1);

            (top..=bottom)
                .flat_map(|row| (left..=right).map(move |col| Position::new(row, col)))
                .filter(|&p| board.token_at(p).is_some())
                .collect()
        }

        SpecialKind::ColorBomb => {
            let target = reference_kind.unwrap_or(token.kind);
            board
                .positions()
                .filter(|&p| board.token_at(p).is_some_and(|t| t.kind == target))
                .collect()
        }
    }
}
