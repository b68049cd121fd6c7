//! Property tests over randomized boards: detection determinism, group
//! shape invariants, and the resolution stability postcondition.

use proptest::prelude::*;
use rustc_hash::FxHashSet;

use match3_engine::{
    find_matches, Board, CascadeEngine, CascadeEvent, Position, SpawnRng, Token, TokenIds,
    TokenKind,
};

/// Random fully-settled boards: 4..=9 on each axis, ~5% blocked cells,
/// uniform token kinds everywhere else.
fn arb_board() -> impl Strategy<Value = Board> {
    (4u8..=9, 4u8..=9)
        .prop_flat_map(|(rows, cols)| {
            let cells = rows as usize * cols as usize;
            (
                Just(rows),
                Just(cols),
                proptest::collection::vec(0..TokenKind::COUNT, cells),
                proptest::collection::vec(prop::bool::weighted(0.05), cells),
            )
        })
        .prop_map(|(rows, cols, kinds, blocks)| {
            let all: Vec<Position> = (0..rows)
                .flat_map(|r| (0..cols).map(move |c| Position::new(r, c)))
                .collect();
            let blocked: FxHashSet<Position> = all
                .iter()
                .zip(&blocks)
                .filter_map(|(&p, &b)| b.then_some(p))
                .collect();

            let mut ids = TokenIds::new();
            let mut board = Board::new(rows, cols, &blocked);
            for (&p, &k) in all.iter().zip(&kinds) {
                if let (false, Some(kind)) = (board.is_blocked(p), TokenKind::from_index(k)) {
                    board.set(p, Token::ordinary(kind, ids.allocate()));
                }
            }
            board
        })
}

fn next_token_ids(board: &Board) -> TokenIds {
    board
        .positions()
        .filter_map(|p| board.token_at(p))
        .map(|t| t.id)
        .max()
        .map_or_else(TokenIds::new, TokenIds::starting_after)
}

proptest! {
    /// Scanning an unchanged board twice yields the identical result.
    #[test]
    fn prop_detection_is_deterministic(board in arb_board()) {
        prop_assert_eq!(find_matches(&board), find_matches(&board));
    }

    /// Every group covers at least 3 cells, all of one kind, each run is
    /// a straight line of 3+, and no cell belongs to two groups.
    #[test]
    fn prop_groups_are_well_formed(board in arb_board()) {
        let groups = find_matches(&board);
        let mut seen: FxHashSet<Position> = FxHashSet::default();

        for group in &groups {
            prop_assert!(group.len() >= 3);
            for &cell in &group.cells {
                let token = board.token_at(cell);
                prop_assert_eq!(token.map(|t| t.kind), Some(group.kind));
                prop_assert!(seen.insert(cell), "cell {} in two groups", cell);
            }
            for run in &group.runs {
                prop_assert!(run.len() >= 3);
                let same_row = run.cells.iter().all(|c| c.row == run.cells[0].row);
                let same_col = run.cells.iter().all(|c| c.col == run.cells[0].col);
                prop_assert!(same_row || same_col);
            }
        }
    }

    /// A full resolution always ends on a settled, matchless board, and
    /// the cleared-token total agrees with the event stream.
    #[test]
    fn prop_resolution_reaches_stable_state(board in arb_board(), seed in any::<u64>()) {
        let mut board = board;
        let mut rng = SpawnRng::new(seed);
        let mut ids = next_token_ids(&board);
        let mut engine = CascadeEngine::new();

        let resolution = engine.resolve(&mut board, &mut rng, &mut ids, None).unwrap();

        prop_assert!(board.is_settled());
        prop_assert!(find_matches(&board).is_empty());
        prop_assert!(engine.is_idle());

        let counted: usize = resolution.events.iter().map(CascadeEvent::cleared_count).sum();
        prop_assert_eq!(counted as u32, resolution.cleared_tokens);
    }

    /// Blocked cells survive resolution untouched and tokens never land
    /// on them.
    #[test]
    fn prop_blocked_cells_are_preserved(board in arb_board(), seed in any::<u64>()) {
        let blocked_before: Vec<Position> = board
            .positions()
            .filter(|&p| board.is_blocked(p))
            .collect();

        let mut board = board;
        let mut rng = SpawnRng::new(seed);
        let mut ids = next_token_ids(&board);
        let mut engine = CascadeEngine::new();
        engine.resolve(&mut board, &mut rng, &mut ids, None).unwrap();

        for p in blocked_before {
            prop_assert!(board.is_blocked(p));
        }
    }

    /// Fall events stay within one column and always move downward.
    #[test]
    fn prop_falls_are_downward_within_a_column(board in arb_board(), seed in any::<u64>()) {
        let mut board = board;
        let mut rng = SpawnRng::new(seed);
        let mut ids = next_token_ids(&board);
        let mut engine = CascadeEngine::new();

        let resolution = engine.resolve(&mut board, &mut rng, &mut ids, None).unwrap();

        for event in &resolution.events {
            if let CascadeEvent::TokenFell { from, to, .. } = event {
                prop_assert_eq!(from.col, to.col);
                prop_assert!(to.row > from.row);
            }
        }
    }
}
