//! Cascade resolution: detect, clear, activate, compact, spawn, repeat.
//!
//! ## State Machine
//!
//! `Idle -> Resolving -> Idle`. A resolution is atomic from the game's
//! point of view: re-entrant `resolve` calls are rejected with
//! `EngineBusy` rather than queued, and a cascade cannot be cancelled
//! halfway (a partial cascade would corrupt board invariants).
//!
//! ## Pass Loop
//!
//! Each pass: run the match finder, clear groups (promoting where the
//! special rules say so), fire activations breadth-first, let tokens
//! fall within their lanes, spawn replacements at lane tops. The loop
//! exits when detection finds nothing and no activation is pending. A
//! spawn that happens to create a new match just feeds the next pass.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Position, SpecialKind, Token, TokenIds, TokenKind};
use crate::core::SpawnRng;
use crate::matching::find_matches;
use crate::specials::{activation_targets, classify, Promotion};

use super::event::CascadeEvent;

/// Engine state. Exposed so hosts can gate input on `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Idle,
    Resolving,
}

/// Rejection for a `resolve` call made while a resolution is running.
///
/// Recoverable: retry once the engine reports `Idle` again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineBusy;

impl std::fmt::Display for EngineBusy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cascade engine is already resolving")
    }
}

/// Context from the swap that triggered a resolution.
///
/// Anchors promotion onto the swap-landing cells during the first pass,
/// and supplies the reference kind when a swapped color bomb fires.
/// Kinds are captured after the swap is committed, so `first_kind` is
/// the kind now sitting at `first`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapTrigger {
    pub first: Position,
    pub second: Position,
    pub first_kind: TokenKind,
    pub second_kind: TokenKind,
}

impl SwapTrigger {
    /// Reference kind for a special activating at `pos`: the kind of the
    /// *other* swapped token, when `pos` is one of the swap cells.
    #[must_use]
    pub fn reference_for(&self, pos: Position) -> Option<TokenKind> {
        if pos == self.first {
            Some(self.second_kind)
        } else if pos == self.second {
            Some(self.first_kind)
        } else {
            None
        }
    }

    /// The swap cell inside `cells`, if any, preferring `first`.
    fn anchor_in(&self, group: &crate::matching::MatchGroup) -> Option<Position> {
        [self.first, self.second]
            .into_iter()
            .find(|&p| group.contains(p))
    }
}

/// A special waiting to fire within the current pass.
#[derive(Clone, Copy, Debug)]
struct PendingActivation {
    pos: Position,
    token: Token,
    /// Direct swap activations remove their own token too; chained ones
    /// were already removed by whatever cleared them.
    include_self: bool,
}

/// Result of one full resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Ordered event stream for presentation and goal tracking.
    pub events: Vec<CascadeEvent>,
    /// Number of detect-to-spawn passes that did work.
    pub passes: u32,
    /// Total tokens removed across all passes.
    pub cleared_tokens: u32,
}

/// Orchestrates cascade resolution over a board.
///
/// The engine owns sequencing only; the board, RNG, and ID allocator
/// are borrowed per call so a session keeps exclusive ownership.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CascadeEngine {
    state: EngineState,
}

impl CascadeEngine {
    /// Create an idle engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Whether a new resolution may start.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == EngineState::Idle
    }

    /// Run one full resolution to a stable board.
    ///
    /// Only callable from `Idle`; rejects with `EngineBusy` otherwise.
    /// On return the board is settled and matchless.
    pub fn resolve(
        &mut self,
        board: &mut Board,
        rng: &mut SpawnRng,
        ids: &mut TokenIds,
        trigger: Option<SwapTrigger>,
    ) -> Result<Resolution, EngineBusy> {
        if !self.is_idle() {
            return Err(EngineBusy);
        }
        self.state = EngineState::Resolving;
        let resolution = run_passes(board, rng, ids, trigger);
        self.state = EngineState::Idle;

        debug_assert!(board.is_settled(), "resolution left unfilled cells");
        Ok(resolution)
    }
}

fn run_passes(
    board: &mut Board,
    rng: &mut SpawnRng,
    ids: &mut TokenIds,
    mut trigger: Option<SwapTrigger>,
) -> Resolution {
    let mut events = Vec::new();
    let mut passes: u32 = 0;
    let mut cleared_tokens: u32 = 0;

    loop {
        let groups = find_matches(board);
        let mut pending: VecDeque<PendingActivation> = VecDeque::new();

        // A swapped-in color bomb fires even without forming a group.
        if let Some(t) = trigger {
            for pos in [t.first, t.second] {
                let Some(token) = board.token_at(pos) else { continue };
                if token.special == SpecialKind::ColorBomb
                    && !groups.iter().any(|g| g.contains(pos))
                {
                    board.clear(pos);
                    pending.push_back(PendingActivation { pos, token, include_self: true });
                }
            }
        }

        if groups.is_empty() && pending.is_empty() {
            break;
        }
        passes += 1;

        // Clear: apply promotions, empty the rest, queue cleared specials
        for group in &groups {
            let anchor = trigger.and_then(|t| t.anchor_in(group));
            let promotion = classify(group, anchor);

            let mut cleared = Vec::with_capacity(group.len());
            let mut promoted: Option<(Position, Token)> = None;

            for &cell in &group.cells {
                if let Promotion::Promote { position, special } = promotion {
                    if cell == position {
                        // Groups never share cells, so the token is still here
                        if let Some(token) = board.token_at(cell) {
                            let upgraded = token.with_special(special);
                            board.set(cell, upgraded);
                            promoted = Some((cell, upgraded));
                        }
                        continue;
                    }
                }
                if let Some(token) = board.clear(cell) {
                    cleared.push(cell);
                    if token.special.is_special() {
                        pending.push_back(PendingActivation {
                            pos: cell,
                            token,
                            include_self: false,
                        });
                    }
                }
            }

            cleared_tokens += cleared.len() as u32;
            events.push(CascadeEvent::GroupCleared { kind: group.kind, cells: cleared });
            if let Some((position, token)) = promoted {
                events.push(CascadeEvent::Promoted { position, token });
            }
        }

        // Activate: breadth-first; each activation may uncover more
        while let Some(activation) = pending.pop_front() {
            let reference = trigger.and_then(|t| t.reference_for(activation.pos));
            let targets = activation_targets(board, activation.pos, activation.token, reference);

            let mut cleared = Vec::with_capacity(targets.len() + 1);
            if activation.include_self {
                cleared.push(activation.pos);
            }
            for target in targets {
                if let Some(victim) = board.clear(target) {
                    cleared.push(target);
                    if victim.special.is_special() {
                        pending.push_back(PendingActivation {
                            pos: target,
                            token: victim,
                            include_self: false,
                        });
                    }
                }
            }

            cleared_tokens += cleared.len() as u32;
            events.push(CascadeEvent::SpecialActivated {
                position: activation.pos,
                special: activation.token.special,
                cleared,
            });
        }

        // Compact: order-preserving gravity within each fall lane
        for lane in board.lanes() {
            let mut write = i16::from(lane.bottom);
            for row in lane.rows().rev() {
                let from = Position::new(row, lane.col);
                if let Some(token) = board.token_at(from) {
                    if i16::from(row) != write {
                        let to = Position::new(write as u8, lane.col);
                        board.clear(from);
                        board.set(to, token);
                        events.push(CascadeEvent::TokenFell { id: token.id, from, to });
                    }
                    write -= 1;
                }
            }
        }

        // Spawn: fill what compaction left open at the lane tops
        for lane in board.lanes() {
            for row in lane.rows() {
                let pos = Position::new(row, lane.col);
                if board.get(pos).is_empty() {
                    let token = Token::ordinary(rng.token_kind(), ids.allocate());
                    board.set(pos, token);
                    events.push(CascadeEvent::Spawned { position: pos, token });
                }
            }
        }

        events.push(CascadeEvent::PassEnded { pass: passes });
        log::debug!(
            "cascade pass {passes}: {} groups, {cleared_tokens} tokens cleared so far",
            groups.len()
        );

        // Anchors and reference kinds only apply to the swap's own pass
        trigger = None;
    }

    Resolution { events, passes, cleared_tokens }
}
