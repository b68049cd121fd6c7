//! Score, special-token counters, and level outcome.
//!
//! The tracker consumes the cascade event stream rather than poking at
//! the board: cleared cells score points, promotion events bump the
//! per-category counters, and `evaluate` decides the level outcome
//! after each full resolution. Meeting the goals on the move that
//! exhausts the budget still wins.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::SpecialCategory;
use crate::cascade::CascadeEvent;
use crate::level::Level;

/// Points awarded per cleared token.
pub const POINTS_PER_TOKEN: u32 = 10;

/// Level outcome. Terminal once it leaves `InProgress`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    /// Whether the level has ended either way.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Tracks score, created specials, and the outcome decision.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GoalTracker {
    score: u32,
    special_counts: FxHashMap<SpecialCategory, u32>,
    outcome: Outcome,
}

impl GoalTracker {
    /// Fresh tracker for a new session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current outcome.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// How many specials of one category have been created.
    #[must_use]
    pub fn special_count(&self, category: SpecialCategory) -> u32 {
        self.special_counts.get(&category).copied().unwrap_or(0)
    }

    /// All non-zero special counters.
    #[must_use]
    pub fn special_counts(&self) -> &FxHashMap<SpecialCategory, u32> {
        &self.special_counts
    }

    /// Fold one resolution's events into score and counters.
    pub fn consume(&mut self, events: &[CascadeEvent]) {
        for event in events {
            self.score += event.cleared_count() as u32 * POINTS_PER_TOKEN;
            if let CascadeEvent::Promoted { token, .. } = event {
                if let Some(category) = token.special.category() {
                    *self.special_counts.entry(category).or_insert(0) += 1;
                }
            }
        }
    }

    /// Whether every goal of the level has been met.
    #[must_use]
    pub fn goals_met(&self, level: &Level) -> bool {
        let specials_done = level
            .goals
            .iter()
            .all(|(&category, &required)| self.special_count(category) >= required);
        let score_done = level.target_score == 0 || self.score >= level.target_score;
        specials_done && score_done
    }

    /// Decide the outcome after a full resolution.
    ///
    /// Goals met wins even when `moves_remaining` just hit zero; the
    /// decision latches once terminal.
    pub fn evaluate(&mut self, level: &Level, moves_remaining: u32) -> Outcome {
        if !self.outcome.is_terminal() {
            if self.goals_met(level) {
                self.outcome = Outcome::Won;
            } else if moves_remaining == 0 {
                self.outcome = Outcome::Lost;
            }
        }
        self.outcome
    }
}
