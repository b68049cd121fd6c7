//! The board grid: positions, cell contents, and mutation primitives.
//!
//! The board is pure data. It knows how to hold, move, and clear tokens;
//! it knows nothing about matches, cascades, or scoring. Row 0 is the top
//! of the board and gravity pulls tokens toward higher row indices.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::token::{Token, TokenIds, TokenKind};

/// A cell coordinate. Derived ordering is row-major (top-left first),
/// which is what match detection and event ordering rely on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Manhattan-distance-1 adjacency (no diagonals).
    #[must_use]
    pub fn is_adjacent_to(self, other: Position) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr + dc == 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// What a single cell holds.
///
/// `Empty` only appears transiently during a resolution step (and in
/// hand-built test boards); a settled board has a token in every
/// non-blocked cell. `Blocked` cells never hold tokens and are excluded
/// from matching and gravity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    Empty,
    Blocked,
    Token(Token),
}

impl CellContent {
    /// Whether the cell is transiently empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// Whether the cell is permanently blocked.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, CellContent::Blocked)
    }

    /// The held token, if any.
    #[must_use]
    pub const fn token(self) -> Option<Token> {
        match self {
            CellContent::Token(token) => Some(token),
            _ => None,
        }
    }
}

/// A maximal vertical segment of non-blocked cells in one column.
///
/// Gravity acts independently within each lane: tokens never fall
/// through a blocked cell, and spawns enter at the lane's top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub col: u8,
    /// Topmost row of the lane (inclusive).
    pub top: u8,
    /// Bottommost row of the lane (inclusive).
    pub bottom: u8,
}

impl Lane {
    /// Iterate the lane's rows top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = u8> {
        self.top..=self.bottom
    }
}

/// 2D grid of cells with fixed dimensions.
///
/// Out-of-range positions are a contract violation and panic; gameplay
/// code validates bounds before touching the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: u8,
    cols: u8,
    cells: Vec<CellContent>,
}

impl Board {
    /// Largest supported dimension on either axis.
    pub const MAX_DIM: u8 = 16;

    /// Create an all-empty board with the given blocked cells.
    ///
    /// ## Panics
    ///
    /// If dimensions are outside `3..=MAX_DIM` or a blocked position is
    /// out of bounds.
    #[must_use]
    pub fn new(rows: u8, cols: u8, blocked: &FxHashSet<Position>) -> Self {
        assert!((3..=Self::MAX_DIM).contains(&rows), "rows must be 3..=16, got {rows}");
        assert!((3..=Self::MAX_DIM).contains(&cols), "cols must be 3..=16, got {cols}");

        let mut board = Self {
            rows,
            cols,
            cells: vec![CellContent::Empty; rows as usize * cols as usize],
        };
        for &pos in blocked {
            let idx = board.index(pos);
            board.cells[idx] = CellContent::Blocked;
        }
        board
    }

    /// Parse a board from a character layout, top row first.
    ///
    /// `R B G Y P O` are ordinary tokens of that kind, `#` is a blocked
    /// cell, `.` is empty. IDs are allocated from `ids` in row-major
    /// order. Intended for tests and level tooling.
    ///
    /// ```
    /// use match3_engine::board::{Board, TokenIds};
    ///
    /// let mut ids = TokenIds::new();
    /// let board = Board::from_layout(&["RGB", "B#Y", "YOR"], &mut ids);
    /// assert_eq!(board.rows(), 3);
    /// ```
    #[must_use]
    pub fn from_layout(layout: &[&str], ids: &mut TokenIds) -> Self {
        let rows = u8::try_from(layout.len()).expect("layout too tall");
        let cols = u8::try_from(layout.first().map_or(0, |r| r.len())).expect("layout too wide");
        let mut board = Self::new(rows, cols, &FxHashSet::default());

        for (r, line) in layout.iter().enumerate() {
            assert_eq!(line.len(), cols as usize, "ragged layout at row {r}");
            for (c, ch) in line.chars().enumerate() {
                let pos = Position::new(r as u8, c as u8);
                let idx = board.index(pos);
                board.cells[idx] = match ch {
                    '.' => CellContent::Empty,
                    '#' => CellContent::Blocked,
                    _ => {
                        let kind = match ch {
                            'R' => TokenKind::Red,
                            'B' => TokenKind::Blue,
                            'G' => TokenKind::Green,
                            'Y' => TokenKind::Yellow,
                            'P' => TokenKind::Purple,
                            'O' => TokenKind::Orange,
                            other => panic!("unknown layout char {other:?} at {pos}"),
                        };
                        CellContent::Token(Token::ordinary(kind, ids.allocate()))
                    }
                };
            }
        }
        board
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Whether a position lies on the board.
    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> usize {
        assert!(self.in_bounds(pos), "position {pos} out of bounds");
        pos.row as usize * self.cols as usize + pos.col as usize
    }

    /// Cell content at an in-bounds position.
    #[must_use]
    pub fn get(&self, pos: Position) -> CellContent {
        self.cells[self.index(pos)]
    }

    /// The token at a position, if the cell holds one.
    #[must_use]
    pub fn token_at(&self, pos: Position) -> Option<Token> {
        self.get(pos).token()
    }

    /// Whether an in-bounds position is blocked.
    #[must_use]
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.get(pos).is_blocked()
    }

    /// Put a token into a cell. The cell must not be blocked.
    pub fn set(&mut self, pos: Position, token: Token) {
        let idx = self.index(pos);
        assert!(
            !self.cells[idx].is_blocked(),
            "cannot place a token on blocked cell {pos}"
        );
        self.cells[idx] = CellContent::Token(token);
    }

    /// Empty a cell, returning the token it held. No-op on empty cells.
    ///
    /// ## Panics
    ///
    /// If the cell is blocked.
    pub fn clear(&mut self, pos: Position) -> Option<Token> {
        let idx = self.index(pos);
        assert!(!self.cells[idx].is_blocked(), "cannot clear blocked cell {pos}");
        let prior = self.cells[idx].token();
        self.cells[idx] = CellContent::Empty;
        prior
    }

    /// Whether two cells can be swap partners: both in bounds, neither
    /// blocked, Manhattan distance exactly 1.
    #[must_use]
    pub fn is_adjacent(&self, a: Position, b: Position) -> bool {
        self.in_bounds(a)
            && self.in_bounds(b)
            && !self.is_blocked(a)
            && !self.is_blocked(b)
            && a.is_adjacent_to(b)
    }

    /// Exchange the tokens in two cells. Both must hold tokens.
    pub fn swap(&mut self, a: Position, b: Position) {
        let ia = self.index(a);
        let ib = self.index(b);
        assert!(
            self.cells[ia].token().is_some() && self.cells[ib].token().is_some(),
            "swap requires tokens in both cells ({a} and {b})"
        );
        self.cells.swap(ia, ib);
    }

    /// All positions in row-major order, blocked cells included.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// Fall lanes of every column, left to right, top to bottom.
    #[must_use]
    pub fn lanes(&self) -> Vec<Lane> {
        let mut lanes = Vec::new();
        for col in 0..self.cols {
            let mut top: Option<u8> = None;
            for row in 0..self.rows {
                let blocked = self.is_blocked(Position::new(row, col));
                match (blocked, top) {
                    (false, None) => top = Some(row),
                    (true, Some(start)) => {
                        lanes.push(Lane { col, top: start, bottom: row - 1 });
                        top = None;
                    }
                    _ => {}
                }
            }
            if let Some(start) = top {
                lanes.push(Lane { col, top: start, bottom: self.rows - 1 });
            }
        }
        lanes
    }

    /// Whether every non-blocked cell holds a token.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.cells.iter().any(|cell| cell.is_empty())
    }

    /// Count on-board tokens of one kind.
    #[must_use]
    pub fn count_kind(&self, kind: TokenKind) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.token().is_some_and(|t| t.kind == kind))
            .count()
    }
}
