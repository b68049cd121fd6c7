//! Cascade resolution integration tests.
//!
//! These drive full resolutions over preloaded boards and verify the
//! event stream, scoring, special activations, and the stability
//! postcondition: after any resolve the board is settled and matchless.

use rustc_hash::FxHashSet;

use match3_engine::{
    find_matches, Board, CascadeEvent, GameSession, Level, Orientation, Position, SpecialKind,
    Token, TokenIds, TokenKind,
};

/// Palette without red, for boards that plant red runs by hand.
const NO_RED: [TokenKind; 5] = [
    TokenKind::Blue,
    TokenKind::Green,
    TokenKind::Yellow,
    TokenKind::Purple,
    TokenKind::Orange,
];

fn pos(row: u8, col: u8) -> Position {
    Position::new(row, col)
}

/// Fill every non-blocked cell so no two orthogonal neighbors share a
/// kind: index (2*row + col) mod 5 steps by 1 horizontally and 2
/// vertically, so the board starts matchless.
fn patterned(
    rows: u8,
    cols: u8,
    palette: [TokenKind; 5],
    blocked: &FxHashSet<Position>,
    ids: &mut TokenIds,
) -> Board {
    let mut board = Board::new(rows, cols, blocked);
    let open: Vec<Position> = board.positions().filter(|&p| !board.is_blocked(p)).collect();
    for p in open {
        let idx = (2 * p.row as usize + p.col as usize) % palette.len();
        board.set(p, Token::ordinary(palette[idx], ids.allocate()));
    }
    board
}

fn pattern_kind(palette: [TokenKind; 5], p: Position) -> TokenKind {
    palette[(2 * p.row as usize + p.col as usize) % palette.len()]
}

fn nine_by_nine(moves: u32) -> Level {
    Level::builder(1).dimensions(9, 9).moves(moves).build()
}

/// First-pass events only (up to and including the first pass marker).
fn first_pass(events: &[CascadeEvent]) -> &[CascadeEvent] {
    let end = events
        .iter()
        .position(|e| matches!(e, CascadeEvent::PassEnded { .. }))
        .map_or(events.len(), |i| i + 1);
    &events[..end]
}

#[test]
fn test_preloaded_red_run_scores_without_consuming_moves() {
    let mut ids = TokenIds::new();
    let mut board = patterned(9, 9, NO_RED, &FxHashSet::default(), &mut ids);
    for col in 0..3 {
        board.set(pos(0, col), Token::ordinary(TokenKind::Red, ids.allocate()));
    }

    let mut session = GameSession::from_board(nine_by_nine(20), board, 42);
    let resolution = session.resolve_board().unwrap();

    assert_eq!(
        resolution.events[0],
        CascadeEvent::GroupCleared {
            kind: TokenKind::Red,
            cells: vec![pos(0, 0), pos(0, 1), pos(0, 2)],
        }
    );
    // Resolving directly never consumes a move; only try_swap does
    assert_eq!(session.moves_remaining(), 20);
    // 10 points per cleared token: 30 for the run, same rate for any
    // follow-up cascade the random replacements happen to form
    assert!(session.score() >= 30);
    assert_eq!(session.score(), resolution.cleared_tokens * 10);
}

#[test]
fn test_resolution_postcondition_settled_and_matchless() {
    for seed in 0..10 {
        let mut ids = TokenIds::new();
        let mut board = patterned(9, 9, NO_RED, &FxHashSet::default(), &mut ids);
        // Vertical red run in the middle of the board
        for row in 3..6 {
            board.set(pos(row, 4), Token::ordinary(TokenKind::Red, ids.allocate()));
        }

        let mut session = GameSession::from_board(nine_by_nine(20), board, seed);
        session.resolve_board().unwrap();

        assert!(session.board().is_settled(), "seed {seed}: unfilled cells");
        assert!(
            find_matches(session.board()).is_empty(),
            "seed {seed}: matches survived resolution"
        );
    }
}

#[test]
fn test_striped_token_cleared_by_match_fires_its_row() {
    let mut ids = TokenIds::new();
    let mut board = patterned(9, 9, NO_RED, &FxHashSet::default(), &mut ids);
    // Red run at (4,2..=4); the leftmost carries a row-striped power
    board.set(
        pos(4, 2),
        Token::ordinary(TokenKind::Red, ids.allocate())
            .with_special(SpecialKind::Striped(Orientation::Row)),
    );
    board.set(pos(4, 3), Token::ordinary(TokenKind::Red, ids.allocate()));
    board.set(pos(4, 4), Token::ordinary(TokenKind::Red, ids.allocate()));

    let mut session = GameSession::from_board(nine_by_nine(20), board, 3);
    let resolution = session.resolve_board().unwrap();

    let activation = first_pass(&resolution.events)
        .iter()
        .find_map(|e| match e {
            CascadeEvent::SpecialActivated { position, special, cleared } => {
                Some((*position, *special, cleared.clone()))
            }
            _ => None,
        })
        .expect("striped token never fired");

    assert_eq!(activation.0, pos(4, 2));
    assert_eq!(activation.1, SpecialKind::Striped(Orientation::Row));
    // The rest of row 4: nine columns minus the three already cleared
    let expected: Vec<Position> = (0..9)
        .filter(|&c| !(2..=4).contains(&c))
        .map(|c| pos(4, c))
        .collect();
    assert_eq!(activation.2, expected);
}

#[test]
fn test_activation_chains_into_second_special() {
    let mut ids = TokenIds::new();
    let mut board = patterned(9, 9, NO_RED, &FxHashSet::default(), &mut ids);
    board.set(
        pos(4, 2),
        Token::ordinary(TokenKind::Red, ids.allocate())
            .with_special(SpecialKind::Striped(Orientation::Row)),
    );
    board.set(pos(4, 3), Token::ordinary(TokenKind::Red, ids.allocate()));
    board.set(pos(4, 4), Token::ordinary(TokenKind::Red, ids.allocate()));
    // A column-striped bystander on the same row, pattern kind so the
    // board stays matchless until the row clear sweeps it up
    board.set(
        pos(4, 7),
        Token::ordinary(pattern_kind(NO_RED, pos(4, 7)), ids.allocate())
            .with_special(SpecialKind::Striped(Orientation::Column)),
    );

    let mut session = GameSession::from_board(nine_by_nine(20), board, 3);
    let resolution = session.resolve_board().unwrap();

    let activations: Vec<_> = first_pass(&resolution.events)
        .iter()
        .filter_map(|e| match e {
            CascadeEvent::SpecialActivated { position, special, cleared } => {
                Some((*position, *special, cleared.clone()))
            }
            _ => None,
        })
        .collect();

    assert_eq!(activations.len(), 2, "chain did not fire");
    assert_eq!(activations[0].0, pos(4, 2));
    assert_eq!(activations[1].0, pos(4, 7));
    assert_eq!(activations[1].1, SpecialKind::Striped(Orientation::Column));
    // Column 7, all rows except the bystander's own (already cleared)
    let expected: Vec<Position> = (0..9).filter(|&r| r != 4).map(|r| pos(r, 7)).collect();
    assert_eq!(activations[1].2, expected);
}

#[test]
fn test_blocked_cell_isolates_fall_lanes() {
    let blocked: FxHashSet<Position> = [pos(4, 4)].into_iter().collect();
    let mut ids = TokenIds::new();
    let mut board = patterned(9, 9, NO_RED, &blocked, &mut ids);
    // Red run at the bottom of column 4's lower lane
    for row in 6..9 {
        board.set(pos(row, 4), Token::ordinary(TokenKind::Red, ids.allocate()));
    }

    let level = Level::builder(2)
        .dimensions(9, 9)
        .moves(20)
        .block(pos(4, 4))
        .build();
    let mut session = GameSession::from_board(level, board, 11);
    let resolution = session.resolve_board().unwrap();

    let pass1 = first_pass(&resolution.events);

    // Only the token below the block may fall: (5,4) drops to the lane
    // bottom. Tokens above the blocked cell stay put.
    for event in pass1 {
        if let CascadeEvent::TokenFell { from, to, .. } = event {
            if from.col == 4 {
                assert!(from.row > 4, "token above blocked cell fell: {from}");
                assert!(to.row > 4, "token crossed blocked cell: {from} -> {to}");
            }
        }
    }
    // Spawns in column 4 land only in the lower lane's opened rows
    for event in pass1 {
        if let CascadeEvent::Spawned { position, .. } = event {
            if position.col == 4 {
                assert!(position.row > 4, "spawn above the block: {position}");
            }
        }
    }
    assert!(session.board().get(pos(4, 4)).is_blocked());
    assert!(session.board().is_settled());
}

#[test]
fn test_wrapped_promotion_from_l_shaped_swap() {
    let mut ids = TokenIds::new();
    let mut board = patterned(9, 9, NO_RED, &FxHashSet::default(), &mut ids);
    // Vertical reds at (2,2),(3,2) and horizontal reds at (4,3),(4,4);
    // swapping (4,2)<->(5,2) is irrelevant -- instead plant the corner
    // directly and resolve: (4,2) completes both runs
    board.set(pos(2, 2), Token::ordinary(TokenKind::Red, ids.allocate()));
    board.set(pos(3, 2), Token::ordinary(TokenKind::Red, ids.allocate()));
    board.set(pos(4, 3), Token::ordinary(TokenKind::Red, ids.allocate()));
    board.set(pos(4, 4), Token::ordinary(TokenKind::Red, ids.allocate()));
    board.set(pos(4, 2), Token::ordinary(TokenKind::Red, ids.allocate()));

    let mut session = GameSession::from_board(nine_by_nine(20), board, 5);
    let resolution = session.resolve_board().unwrap();

    let promotion = first_pass(&resolution.events)
        .iter()
        .find_map(|e| match e {
            CascadeEvent::Promoted { position, token } => Some((*position, *token)),
            _ => None,
        })
        .expect("no promotion");

    assert_eq!(promotion.0, pos(4, 2));
    assert_eq!(promotion.1.special, SpecialKind::Wrapped);
    assert_eq!(promotion.1.kind, TokenKind::Red);
}
