//! Match detection over a board snapshot.
//!
//! Pure functions: scanning never mutates the board, and re-running the
//! scan on an unchanged board yields the identical result. Empty and
//! blocked cells break runs; a token's special power is invisible here
//! (a striped red and a plain red are both "red").

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::board::{Board, Orientation, Position, TokenKind};

/// A maximal straight-line run of 3+ equal-kind tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub kind: TokenKind,
    pub orientation: Orientation,
    /// Cells in scan order (left-to-right or top-to-bottom).
    pub cells: SmallVec<[Position; 5]>,
}

impl Run {
    /// Number of cells in the run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Runs are never empty; provided for clippy symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the run covers a cell.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// The union of mutually overlapping runs, resolved as one match event.
///
/// An L/T-shaped match is one group built from an intersecting
/// horizontal and vertical run. Two groups never share a cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    pub kind: TokenKind,
    /// Covered cells, deduplicated, sorted row-major.
    pub cells: SmallVec<[Position; 8]>,
    /// The contributing runs, horizontal scans first.
    pub runs: SmallVec<[Run; 2]>,
}

impl MatchGroup {
    /// Number of distinct cells covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Groups are never empty; provided for clippy symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Topmost-leftmost covered cell, the group's stable sort key.
    #[must_use]
    pub fn origin(&self) -> Position {
        self.cells[0]
    }

    /// Whether the group covers a cell.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.binary_search(&pos).is_ok()
    }
}

/// Find all match groups on the board.
///
/// Scans every row and column for maximal runs of 3+ equal kinds, then
/// unions runs sharing a cell into groups. Output is sorted row-major by
/// group origin, so downstream tie-breaking is deterministic.
#[must_use]
pub fn find_matches(board: &Board) -> Vec<MatchGroup> {
    let runs = scan_runs(board);
    group_runs(runs)
}

/// Maximal horizontal then vertical runs, in scan order.
fn scan_runs(board: &Board) -> Vec<Run> {
    let mut runs = Vec::new();

    for row in 0..board.rows() {
        let line = (0..board.cols()).map(|col| Position::new(row, col));
        collect_line_runs(board, line, Orientation::Row, &mut runs);
    }
    for col in 0..board.cols() {
        let line = (0..board.rows()).map(|row| Position::new(row, col));
        collect_line_runs(board, line, Orientation::Column, &mut runs);
    }

    runs
}

fn collect_line_runs(
    board: &Board,
    line: impl Iterator<Item = Position>,
    orientation: Orientation,
    out: &mut Vec<Run>,
) {
    let mut current: Option<(TokenKind, SmallVec<[Position; 5]>)> = None;

    let mut flush = |current: &mut Option<(TokenKind, SmallVec<[Position; 5]>)>| {
        if let Some((kind, cells)) = current.take() {
            if cells.len() >= 3 {
                out.push(Run { kind, orientation, cells });
            }
        }
    };

    for pos in line {
        match board.token_at(pos) {
            Some(token) => match &mut current {
                Some((kind, cells)) if *kind == token.kind => cells.push(pos),
                _ => {
                    flush(&mut current);
                    current = Some((token.kind, SmallVec::from_slice(&[pos])));
                }
            },
            // Empty or blocked cells break runs
            None => flush(&mut current),
        }
    }
    flush(&mut current);
}

/// Union-find over run indices keyed by shared cells.
struct RunSets {
    parent: Vec<usize>,
}

impl RunSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            let root = self.find(self.parent[i]);
            self.parent[i] = root;
        }
        self.parent[i]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Attach to the lower index so roots stay scan-ordered
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}

fn group_runs(runs: Vec<Run>) -> Vec<MatchGroup> {
    let mut sets = RunSets::new(runs.len());
    let mut cell_owner: FxHashMap<Position, usize> = FxHashMap::default();

    for (idx, run) in runs.iter().enumerate() {
        for &cell in &run.cells {
            match cell_owner.get(&cell) {
                Some(&owner) => sets.union(owner, idx),
                None => {
                    cell_owner.insert(cell, idx);
                }
            }
        }
    }

    let mut group_index: FxHashMap<usize, usize> = FxHashMap::default();
    let mut groups: Vec<MatchGroup> = Vec::new();

    for (idx, run) in runs.into_iter().enumerate() {
        let root = sets.find(idx);
        match group_index.get(&root) {
            Some(&g) => {
                groups[g].cells.extend(run.cells.iter().copied());
                groups[g].runs.push(run);
            }
            None => {
                group_index.insert(root, groups.len());
                groups.push(MatchGroup {
                    kind: run.kind,
                    cells: run.cells.iter().copied().collect(),
                    runs: smallvec![run],
                });
            }
        }
    }

    for group in &mut groups {
        group.cells.sort();
        group.cells.dedup();
    }
    groups.sort_by_key(MatchGroup::origin);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TokenIds;

    fn board(layout: &[&str]) -> Board {
        Board::from_layout(layout, &mut TokenIds::new())
    }

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_no_matches_on_scrambled_board() {
        let b = board(&["RGB", "GBR", "BRG"]);
        assert!(find_matches(&b).is_empty());
    }

    #[test]
    fn test_horizontal_run_of_three() {
        let b = board(&["RRRG", "GBYB", "BYGO", "YOBP"]);
        let groups = find_matches(&b);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, TokenKind::Red);
        assert_eq!(groups[0].cells.as_slice(), &[pos(0, 0), pos(0, 1), pos(0, 2)]);
        assert_eq!(groups[0].runs.len(), 1);
        assert_eq!(groups[0].runs[0].orientation, Orientation::Row);
    }

    #[test]
    fn test_vertical_run_of_three() {
        let b = board(&["RGB", "RBY", "RYG", "GOB"]);
        let groups = find_matches(&b);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].runs[0].orientation, Orientation::Column);
        assert_eq!(groups[0].cells.as_slice(), &[pos(0, 0), pos(1, 0), pos(2, 0)]);
    }

    #[test]
    fn test_runs_are_maximal_not_windowed() {
        // A 5-long run is one run of 5, not three overlapping runs of 3
        let b = board(&["RRRRR", "GBYBG", "BYGOB", "YOBPG", "OGYRB"]);
        let groups = find_matches(&b);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].runs.len(), 1);
        assert_eq!(groups[0].runs[0].len(), 5);
    }

    #[test]
    fn test_six_run_groups_without_truncation() {
        // Long enough to spill the inline cell storage on both the run
        // and the group
        let b = board(&[
            "RRRRRR", "YPOBGY", "OBGYPO", "GYPOBG", "POBGYP", "BGYPOB",
        ]);
        let groups = find_matches(&b);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 6);
        assert_eq!(groups[0].runs.len(), 1);
        assert_eq!(groups[0].runs[0].len(), 6);
        assert_eq!(groups[0].cells.as_slice(), groups[0].runs[0].cells.as_slice());
    }

    #[test]
    fn test_two_runs_of_two_do_not_match() {
        let b = board(&["RRG", "GRB", "BGY"]);
        assert!(find_matches(&b).is_empty());
    }

    #[test]
    fn test_l_shape_unions_into_one_group() {
        let b = board(&["RGB", "RBY", "RRR"]);
        let groups = find_matches(&b);

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.runs.len(), 2);
        assert_eq!(group.len(), 5);
        assert!(group.contains(pos(2, 0)));
        assert_eq!(group.origin(), pos(0, 0));
    }

    #[test]
    fn test_disjoint_groups_stay_separate_and_sorted() {
        let b = board(&["RRRGB", "GBYBG", "BYGOB", "YOBPG", "GGGYB"]);
        let groups = find_matches(&b);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].kind, TokenKind::Red);
        assert_eq!(groups[0].origin(), pos(0, 0));
        assert_eq!(groups[1].kind, TokenKind::Green);
        assert_eq!(groups[1].origin(), pos(4, 0));
    }

    #[test]
    fn test_blocked_cells_break_runs() {
        let b = board(&["RR#RR", "GBYBG", "BYGOB"]);
        assert!(find_matches(&b).is_empty());
    }

    #[test]
    fn test_empty_cells_break_runs() {
        let b = board(&["RR.RR", "GBYBG", "BYGOB"]);
        assert!(find_matches(&b).is_empty());
    }

    #[test]
    fn test_idempotent_on_unchanged_board() {
        let b = board(&["RRRGB", "GBYBG", "BYGOB", "YOBPG", "GGGYB"]);
        assert_eq!(find_matches(&b), find_matches(&b));
    }

    #[test]
    fn test_groups_never_share_cells() {
        // Cross shape: one horizontal and one vertical red run through (1,2)
        let b = board(&["GBRYO", "RRRRB", "GBRYO", "YOBGP", "BGYOR"]);
        let groups = find_matches(&b);

        let mut seen = std::collections::HashSet::new();
        for group in &groups {
            for &cell in &group.cells {
                assert!(seen.insert(cell), "cell {cell} appears in two groups");
            }
        }
    }
}
