//! Level configuration: static data consumed by the core.
//!
//! A level fixes the board dimensions, blocked-cell layout, move budget,
//! target score, and special-token goals. Levels are immutable once
//! built; the engine never generates them. A small built-in catalog
//! ships for demos and tests; real games load their own.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Position, SpecialCategory};

/// Static configuration for one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level number, reported on completion for persistence.
    pub number: u32,
    pub rows: u8,
    pub cols: u8,
    /// Move budget; each accepted swap consumes one.
    pub moves: u32,
    /// Minimum score required to win. 0 disables the score requirement.
    pub target_score: u32,
    /// Cells that never hold tokens.
    pub blocked: FxHashSet<Position>,
    /// Special tokens the player must create, per category.
    pub goals: FxHashMap<SpecialCategory, u32>,
}

impl Level {
    /// Start building a level.
    #[must_use]
    pub fn builder(number: u32) -> LevelBuilder {
        LevelBuilder::new(number)
    }

    /// Whether a position is blocked in this level.
    #[must_use]
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.blocked.contains(&pos)
    }

    /// Required count for one goal category (0 if the level has none).
    #[must_use]
    pub fn goal(&self, category: SpecialCategory) -> u32 {
        self.goals.get(&category).copied().unwrap_or(0)
    }

    /// The built-in three-level catalog.
    ///
    /// Increasing move budgets and goal mixes, with blocked-cell layouts
    /// that split fall lanes from level 2 onward.
    #[must_use]
    pub fn catalog() -> Vec<Level> {
        vec![
            Level::builder(1)
                .dimensions(9, 9)
                .moves(20)
                .target_score(1000)
                .goal(SpecialCategory::Striped, 2)
                .build(),
            Level::builder(2)
                .dimensions(9, 9)
                .moves(25)
                .target_score(2000)
                .goal(SpecialCategory::Striped, 3)
                .goal(SpecialCategory::Wrapped, 1)
                .block(Position::new(4, 4))
                .build(),
            Level::builder(3)
                .dimensions(9, 9)
                .moves(30)
                .target_score(3000)
                .goal(SpecialCategory::Striped, 2)
                .goal(SpecialCategory::Wrapped, 2)
                .goal(SpecialCategory::ColorBomb, 1)
                .block(Position::new(3, 3))
                .block(Position::new(3, 5))
                .block(Position::new(5, 3))
                .block(Position::new(5, 5))
                .build(),
        ]
    }
}

/// Builder for `Level`.
pub struct LevelBuilder {
    number: u32,
    rows: u8,
    cols: u8,
    moves: u32,
    target_score: u32,
    blocked: FxHashSet<Position>,
    goals: FxHashMap<SpecialCategory, u32>,
}

impl LevelBuilder {
    fn new(number: u32) -> Self {
        Self {
            number,
            rows: 9,
            cols: 9,
            moves: 20,
            target_score: 0,
            blocked: FxHashSet::default(),
            goals: FxHashMap::default(),
        }
    }

    /// Board dimensions (3..=16 on each axis).
    #[must_use]
    pub fn dimensions(mut self, rows: u8, cols: u8) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Move budget. Must be at least 1.
    #[must_use]
    pub fn moves(mut self, moves: u32) -> Self {
        self.moves = moves;
        self
    }

    /// Minimum winning score (0 disables).
    #[must_use]
    pub fn target_score(mut self, score: u32) -> Self {
        self.target_score = score;
        self
    }

    /// Mark one cell blocked.
    #[must_use]
    pub fn block(mut self, pos: Position) -> Self {
        self.blocked.insert(pos);
        self
    }

    /// Require `count` specials of `category`.
    #[must_use]
    pub fn goal(mut self, category: SpecialCategory, count: u32) -> Self {
        self.goals.insert(category, count);
        self
    }

    /// Finish the level.
    ///
    /// ## Panics
    ///
    /// If dimensions fall outside the board's supported range, the move
    /// budget is zero, or a blocked cell lies out of bounds.
    #[must_use]
    pub fn build(self) -> Level {
        assert!(
            (3..=Board::MAX_DIM).contains(&self.rows) && (3..=Board::MAX_DIM).contains(&self.cols),
            "level {} dimensions {}x{} unsupported",
            self.number,
            self.rows,
            self.cols
        );
        assert!(self.moves >= 1, "level {} needs a move budget", self.number);
        for &pos in &self.blocked {
            assert!(
                pos.row < self.rows && pos.col < self.cols,
                "level {} blocked cell {pos} out of bounds",
                self.number
            );
        }

        Level {
            number: self.number,
            rows: self.rows,
            cols: self.cols,
            moves: self.moves,
            target_score: self.target_score,
            blocked: self.blocked,
            goals: self.goals,
        }
    }
}
