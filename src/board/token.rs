//! Token identity: ordinary kinds, special powers, and tracing IDs.
//!
//! A token's `TokenKind` is its matching identity and never changes once
//! assigned. A `SpecialKind` may be layered on top by a promotion; the
//! token keeps its kind, which is what a color bomb matches against.

use serde::{Deserialize, Serialize};

/// The "color" identity of an ordinary token.
///
/// Equality of kinds is the only thing match detection looks at; special
/// powers never affect whether two tokens match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl TokenKind {
    /// All ordinary kinds, in spawn-index order.
    pub const ALL: [TokenKind; 6] = [
        TokenKind::Red,
        TokenKind::Blue,
        TokenKind::Green,
        TokenKind::Yellow,
        TokenKind::Purple,
        TokenKind::Orange,
    ];

    /// Number of ordinary kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Kind at a spawn index, if in range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<TokenKind> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Red => "Red",
            TokenKind::Blue => "Blue",
            TokenKind::Green => "Green",
            TokenKind::Yellow => "Yellow",
            TokenKind::Purple => "Purple",
            TokenKind::Orange => "Orange",
        };
        write!(f, "{name}")
    }
}

/// Orientation of a run, and of the clear line a striped token fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Row,
    Column,
}

/// The special power a token may carry besides its color.
///
/// A striped token remembers which way it clears: the orientation is
/// fixed at creation time from the run that produced it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    /// Ordinary token, no power.
    #[default]
    None,
    /// Clears its whole row or column on activation.
    Striped(Orientation),
    /// Clears the 3x3 neighborhood around itself on activation.
    Wrapped,
    /// Clears every token of a reference kind on activation.
    ColorBomb,
}

impl SpecialKind {
    /// Whether this is an actual power (anything but `None`).
    #[must_use]
    pub const fn is_special(self) -> bool {
        !matches!(self, SpecialKind::None)
    }

    /// Goal-counting category, with striped orientation collapsed.
    ///
    /// Returns `None` for ordinary tokens.
    #[must_use]
    pub const fn category(self) -> Option<SpecialCategory> {
        match self {
            SpecialKind::None => None,
            SpecialKind::Striped(_) => Some(SpecialCategory::Striped),
            SpecialKind::Wrapped => Some(SpecialCategory::Wrapped),
            SpecialKind::ColorBomb => Some(SpecialCategory::ColorBomb),
        }
    }
}

/// Special-token category used by level goals and counters.
///
/// Levels don't care which way a striped token points, so goals are
/// keyed by category rather than `SpecialKind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialCategory {
    Striped,
    Wrapped,
    ColorBomb,
}

impl std::fmt::Display for SpecialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SpecialCategory::Striped => "Striped",
            SpecialCategory::Wrapped => "Wrapped",
            SpecialCategory::ColorBomb => "ColorBomb",
        };
        write!(f, "{name}")
    }
}

/// Unique identifier for a token within one session.
///
/// IDs exist so events can be traced back to individual tokens (two red
/// tokens look identical otherwise). Gameplay decisions never read them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl TokenId {
    /// Create a token ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

/// Monotonic token ID allocator, one per session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIds {
    next: u32,
}

impl TokenIds {
    /// Create an allocator starting at ID 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator that starts above `floor` (for preloaded boards).
    #[must_use]
    pub fn starting_after(floor: TokenId) -> Self {
        Self {
            next: floor.raw().saturating_add(1),
        }
    }

    /// Allocate the next ID.
    pub fn allocate(&mut self) -> TokenId {
        let id = TokenId(self.next);
        self.next += 1;
        id
    }
}

/// A token value: color, special power, and tracing ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Matching identity. Immutable once assigned.
    pub kind: TokenKind,
    /// Special power, `SpecialKind::None` for ordinary tokens.
    pub special: SpecialKind,
    /// Tracing ID, unique within a session.
    pub id: TokenId,
}

impl Token {
    /// Create an ordinary token with no special power.
    #[must_use]
    pub const fn ordinary(kind: TokenKind, id: TokenId) -> Self {
        Self {
            kind,
            special: SpecialKind::None,
            id,
        }
    }

    /// Copy of this token carrying the given special power.
    #[must_use]
    pub const fn with_special(self, special: SpecialKind) -> Self {
        Self { special, ..self }
    }
}
