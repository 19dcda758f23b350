use std::str::FromStr;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform draw over the seven kinds, with replacement.
///
/// Each sample is independent: there is no bag, so repeats and droughts are possible.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece kind: {input:?} (expected one of I, O, T, S, Z, J, L)")]
pub struct ParsePieceKindError {
    input: String,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds, in table order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the static shape (rotation-0 occupancy and display color) of this kind.
    #[must_use]
    pub fn shape(self) -> &'static Shape {
        &SHAPES[self as usize]
    }

    /// Returns the display color of this kind.
    #[must_use]
    pub fn color(self) -> Rgb {
        self.shape().color
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('S'), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

impl FromStr for PieceKind {
    type Err = ParsePieceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
        .ok_or_else(|| ParsePieceKindError {
            input: s.to_owned(),
        })
    }
}

/// 24-bit display color.
///
/// Formats as a CSS-style hex string (`#00f0f0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("#{_0:02x}{_1:02x}{_2:02x}")]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Static geometry and color of a piece kind.
///
/// `blocks` is the occupancy matrix at rotation 0, row-major, top row first.
/// Every other rotation is derived from it; nothing else in the crate spells
/// out piece cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    blocks: &'static [&'static [bool]],
    color: Rgb,
}

impl Shape {
    #[must_use]
    pub const fn blocks(&self) -> &'static [&'static [bool]] {
        self.blocks
    }

    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Number of rows in the rotation-0 bounding box.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.blocks.len()
    }

    /// Number of columns in the rotation-0 bounding box.
    #[must_use]
    pub const fn cols(&self) -> usize {
        if self.blocks.is_empty() {
            0
        } else {
            self.blocks[0].len()
        }
    }
}

static SHAPES: [Shape; PieceKind::LEN] = {
    const X: bool = true;
    const E: bool = false;
    [
        // I-piece: the empty leading row is why it spawns one row higher.
        Shape {
            blocks: &[&[E, E, E, E], &[X, X, X, X], &[E, E, E, E], &[E, E, E, E]],
            color: Rgb(0x00, 0xf0, 0xf0),
        },
        // O-piece
        Shape {
            blocks: &[&[X, X], &[X, X]],
            color: Rgb(0xf0, 0xf0, 0x00),
        },
        // T-piece
        Shape {
            blocks: &[&[E, X, E], &[X, X, X], &[E, E, E]],
            color: Rgb(0xa0, 0x00, 0xf0),
        },
        // S-piece
        Shape {
            blocks: &[&[E, X, X], &[X, X, E], &[E, E, E]],
            color: Rgb(0x00, 0xf0, 0x00),
        },
        // Z-piece
        Shape {
            blocks: &[&[X, X, E], &[E, X, X], &[E, E, E]],
            color: Rgb(0xf0, 0x00, 0x00),
        },
        // J-piece
        Shape {
            blocks: &[&[X, E, E], &[X, X, X], &[E, E, E]],
            color: Rgb(0x00, 0x00, 0xf0),
        },
        // L-piece
        Shape {
            blocks: &[&[E, E, X], &[X, X, X], &[E, E, E]],
            color: Rgb(0xf0, 0xa0, 0x00),
        },
    ]
};
