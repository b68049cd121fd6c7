//! The game session: swap validation, resolution, and outcome surface.
//!
//! A `GameSession` is the single mutable aggregate for one level
//! attempt. It exclusively owns the board, engine, RNG, and tracker;
//! nothing is shared across sessions. `try_swap` is the only mutating
//! entry point collaborators get besides construction.
//!
//! ## Swap policy
//!
//! A swap that would produce no match is rejected upfront with
//! `NoMatch` and consumes no move: the board is cloned, the swap
//! simulated, and the match finder consulted before anything commits.
//! This replaces the visible swap-then-revert dance (which also burned
//! the move) with the "only legal moves succeed" convention. Swaps
//! involving a color bomb skip the pre-check: a bomb fires against its
//! partner's kind regardless of runs.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Position, SpecialKind, Token, TokenId, TokenIds, TokenKind};
use crate::cascade::{CascadeEngine, EngineBusy, EngineState, Resolution, SwapTrigger};
use crate::core::SpawnRng;
use crate::level::Level;
use crate::matching::find_matches;

use super::goals::{GoalTracker, Outcome};
use super::snapshot::{CompletionReport, SessionSnapshot};

/// Why a swap was rejected. No state changes on rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapRejection {
    /// A position lies off the board.
    OutOfBounds,
    /// A cell is blocked (or holds no token mid-resolution).
    Blocked,
    /// The cells are not orthogonal neighbors.
    NotAdjacent,
    /// The swap would produce no match.
    NoMatch,
    /// A resolution is still running; retry once the engine is idle.
    EngineBusy,
    /// The level already ended.
    GameOver,
}

impl std::fmt::Display for SwapRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            SwapRejection::OutOfBounds => "position out of bounds",
            SwapRejection::Blocked => "cell is blocked or empty",
            SwapRejection::NotAdjacent => "cells are not adjacent",
            SwapRejection::NoMatch => "swap would produce no match",
            SwapRejection::EngineBusy => "engine is resolving",
            SwapRejection::GameOver => "level already ended",
        };
        write!(f, "{reason}")
    }
}

/// Result of a swap request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapResult {
    /// Swap refused; board and move count untouched.
    Rejected(SwapRejection),
    /// Swap committed and fully resolved.
    Resolved {
        resolution: Resolution,
        snapshot: SessionSnapshot,
    },
}

impl SwapResult {
    /// Whether the swap was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, SwapResult::Resolved { .. })
    }
}

/// One level attempt: board, engine, RNG, tracker, and move budget.
#[derive(Clone, Debug)]
pub struct GameSession {
    level: Level,
    board: Board,
    engine: CascadeEngine,
    tracker: GoalTracker,
    rng: SpawnRng,
    ids: TokenIds,
    moves_remaining: u32,
}

impl GameSession {
    /// Start a session: build the level's board and fill it with random
    /// tokens, rerolling matched cells until no pre-made matches remain.
    ///
    /// The seed fully determines the fill and every later spawn.
    #[must_use]
    pub fn new(level: Level, seed: u64) -> Self {
        let mut rng = SpawnRng::new(seed);
        let mut ids = TokenIds::new();
        let mut board = Board::new(level.rows, level.cols, &level.blocked);

        let open_cells: Vec<Position> = board
            .positions()
            .filter(|&pos| !board.is_blocked(pos))
            .collect();
        for &pos in &open_cells {
            board.set(pos, Token::ordinary(rng.token_kind(), ids.allocate()));
        }

        // A session never starts with matches on the board
        loop {
            let groups = find_matches(&board);
            if groups.is_empty() {
                break;
            }
            for group in &groups {
                for &cell in &group.cells {
                    board.set(cell, Token::ordinary(rng.token_kind(), ids.allocate()));
                }
            }
        }

        log::debug!("session start: level {}, seed {seed}", level.number);
        Self {
            moves_remaining: level.moves,
            level,
            board,
            engine: CascadeEngine::new(),
            tracker: GoalTracker::new(),
            rng,
            ids,
        }
    }

    /// Start a session over a preloaded board (scripted levels, tests).
    ///
    /// ## Panics
    ///
    /// If the board's dimensions disagree with the level or any
    /// non-blocked cell is empty.
    #[must_use]
    pub fn from_board(level: Level, board: Board, seed: u64) -> Self {
        assert!(
            board.rows() == level.rows && board.cols() == level.cols,
            "board {}x{} does not fit level {} ({}x{})",
            board.rows(),
            board.cols(),
            level.number,
            level.rows,
            level.cols
        );
        assert!(board.is_settled(), "preloaded board has empty cells");

        let max_id = board
            .positions()
            .filter_map(|pos| board.token_at(pos))
            .map(|token| token.id)
            .max();
        let ids = max_id.map_or_else(TokenIds::new, TokenIds::starting_after);

        Self {
            moves_remaining: level.moves,
            level,
            board,
            engine: CascadeEngine::new(),
            tracker: GoalTracker::new(),
            rng: SpawnRng::new(seed),
            ids,
        }
    }

    /// The level this session plays.
    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Read-only view of the board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves left in the budget.
    #[must_use]
    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.tracker.score()
    }

    /// Current outcome.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.tracker.outcome()
    }

    /// Engine state, for hosts that gate input on `Idle`.
    #[must_use]
    pub fn engine_state(&self) -> EngineState {
        self.engine.state()
    }

    /// Point-in-time state for rendering and persistence.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            score: self.tracker.score(),
            moves_remaining: self.moves_remaining,
            special_counts: self.tracker.special_counts().clone(),
            outcome: self.tracker.outcome(),
        }
    }

    /// What the persistence collaborator should record, once won.
    #[must_use]
    pub fn completion_report(&self) -> Option<CompletionReport> {
        (self.tracker.outcome() == Outcome::Won).then(|| CompletionReport {
            level_number: self.level.number,
            final_score: self.tracker.score(),
        })
    }

    /// Validate and perform a swap, then resolve the board to rest.
    ///
    /// The only mutating entry point for gameplay input. Rejections
    /// leave the session untouched and consume no move.
    pub fn try_swap(&mut self, a: Position, b: Position) -> SwapResult {
        if let Err(rejection) = self.validate_swap(a, b) {
            log::debug!("swap {a}<->{b} rejected: {rejection}");
            return SwapResult::Rejected(rejection);
        }

        // validate_swap guarantees tokens in both cells
        let (Some(token_a), Some(token_b)) = (self.board.token_at(a), self.board.token_at(b))
        else {
            return SwapResult::Rejected(SwapRejection::Blocked);
        };

        // Committed: tokens trade places and the move is spent
        self.board.swap(a, b);
        self.moves_remaining -= 1;
        let trigger = SwapTrigger {
            first: a,
            second: b,
            first_kind: token_b.kind,
            second_kind: token_a.kind,
        };

        let resolution = match self
            .engine
            .resolve(&mut self.board, &mut self.rng, &mut self.ids, Some(trigger))
        {
            Ok(resolution) => resolution,
            // validate_swap checked idle; nothing else can start a resolution
            Err(EngineBusy) => return SwapResult::Rejected(SwapRejection::EngineBusy),
        };

        self.tracker.consume(&resolution.events);
        let outcome = self.tracker.evaluate(&self.level, self.moves_remaining);
        if outcome.is_terminal() {
            log::info!(
                "level {} ended: {:?}, score {}",
                self.level.number,
                outcome,
                self.tracker.score()
            );
        }

        SwapResult::Resolved {
            resolution,
            snapshot: self.snapshot(),
        }
    }

    fn validate_swap(&self, a: Position, b: Position) -> Result<(), SwapRejection> {
        if self.tracker.outcome().is_terminal() {
            return Err(SwapRejection::GameOver);
        }
        if !self.engine.is_idle() {
            return Err(SwapRejection::EngineBusy);
        }
        if !self.board.in_bounds(a) || !self.board.in_bounds(b) {
            return Err(SwapRejection::OutOfBounds);
        }
        let (Some(token_a), Some(token_b)) = (self.board.token_at(a), self.board.token_at(b))
        else {
            return Err(SwapRejection::Blocked);
        };
        if !a.is_adjacent_to(b) {
            return Err(SwapRejection::NotAdjacent);
        }

        let bomb_swap = token_a.special == SpecialKind::ColorBomb
            || token_b.special == SpecialKind::ColorBomb;
        if !bomb_swap {
            let mut preview = self.board.clone();
            preview.swap(a, b);
            if find_matches(&preview).is_empty() {
                return Err(SwapRejection::NoMatch);
            }
        }
        Ok(())
    }

    /// Resolve the current board without consuming a move.
    ///
    /// For scripted setups and tests; gameplay goes through `try_swap`.
    /// Goal tracking consumes the resulting events as usual.
    pub fn resolve_board(&mut self) -> Result<Resolution, EngineBusy> {
        let resolution = self
            .engine
            .resolve(&mut self.board, &mut self.rng, &mut self.ids, None)?;
        self.tracker.consume(&resolution.events);
        self.tracker.evaluate(&self.level, self.moves_remaining);
        Ok(resolution)
    }

    /// Replace one cell's token, keeping IDs unique (scripted setups).
    pub fn place_token(&mut self, pos: Position, kind: TokenKind, special: SpecialKind) -> TokenId {
        let id = self.ids.allocate();
        self.board.set(pos, Token::ordinary(kind, id).with_special(special));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    fn small_level() -> Level {
        Level::builder(1).dimensions(5, 5).moves(10).build()
    }

    #[test]
    fn test_new_session_starts_matchless_and_settled() {
        for seed in 0..20 {
            let session = GameSession::new(small_level(), seed);
            assert!(session.board().is_settled(), "seed {seed} left empty cells");
            assert!(
                find_matches(session.board()).is_empty(),
                "seed {seed} started with matches"
            );
        }
    }

    #[test]
    fn test_new_session_respects_blocked_cells() {
        let level = Level::builder(2)
            .dimensions(5, 5)
            .moves(10)
            .block(pos(2, 2))
            .build();
        let session = GameSession::new(level, 7);

        assert!(session.board().get(pos(2, 2)).is_blocked());
        assert!(session.board().is_settled());
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = GameSession::new(small_level(), 99);
        let b = GameSession::new(small_level(), 99);
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_snapshot_reflects_fresh_session() {
        let session = GameSession::new(small_level(), 1);
        let snapshot = session.snapshot();

        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.moves_remaining, 10);
        assert_eq!(snapshot.outcome, Outcome::InProgress);
        assert!(snapshot.special_counts.is_empty());
        assert!(session.completion_report().is_none());
    }
}
