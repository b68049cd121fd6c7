//! Read-only state surfaces for presentation and persistence layers.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::SpecialCategory;

use super::goals::Outcome;

/// Point-in-time session state, emitted after every resolution.
///
/// Renderers draw the HUD from this; persistence layers decide what to
/// write when `outcome` turns terminal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub score: u32,
    pub moves_remaining: u32,
    /// Specials created so far, per category (zero counts omitted).
    pub special_counts: FxHashMap<SpecialCategory, u32>,
    pub outcome: Outcome,
}

/// Handed to the persistence collaborator when a level is won.
///
/// The core holds no storage: recording the high score and unlocking
/// the next level happen outside, and may be retried externally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub level_number: u32,
    pub final_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serde_roundtrip() {
        let mut special_counts = FxHashMap::default();
        special_counts.insert(SpecialCategory::Striped, 2);

        let snapshot = SessionSnapshot {
            score: 340,
            moves_remaining: 7,
            special_counts,
            outcome: Outcome::InProgress,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }
}
