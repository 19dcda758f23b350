use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{
    playfield::Playfield,
    shape::{ParsePieceKindError, PieceKind},
};

/// Largest bounding box side of any piece (the I-piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Upper bound on the number of occupied cells a bounding box can hold.
pub const MAX_PIECE_CELLS: usize = MAX_SHAPE_SIZE * MAX_SHAPE_SIZE;

/// Absolute `(col, row)` positions occupied by a piece.
///
/// Rows may be negative: pieces are allowed to project above the visible grid.
pub type PieceCells = ArrayVec<(i32, i32), MAX_PIECE_CELLS>;

/// Rotation state of a piece.
///
/// Represents one of four rotation states:
///
/// - `0`: 0° (spawn orientation)
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Any index is reduced modulo 4 on construction, so out-of-range values cannot exist.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation(u8);

impl Rotation {
    pub const SPAWN: Self = Self(0);

    #[must_use]
    pub const fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn clockwise(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn counter_clockwise(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    #[must_use]
    pub const fn half_turn(self) -> Self {
        Self((self.0 + 2) % 4)
    }
}

/// Boolean occupancy matrix of a piece at a specific rotation.
///
/// Stored row-major with up to [`MAX_SHAPE_SIZE`] rows and columns. The matrix
/// is not required to be square, though every shape in the table is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    rows: ArrayVec<ArrayVec<bool, MAX_SHAPE_SIZE>, MAX_SHAPE_SIZE>,
}

impl Occupancy {
    fn from_blocks(blocks: &[&[bool]]) -> Self {
        let rows = blocks
            .iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.rows.first().map_or(0, ArrayVec::len)
    }

    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Rotates the matrix 90° clockwise.
    ///
    /// An R×C matrix becomes C×R; source cell `(r, c)` lands on `(c, R-1-r)`.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let (r_len, c_len) = (self.rows(), self.cols());
        let mut rows: ArrayVec<ArrayVec<bool, MAX_SHAPE_SIZE>, MAX_SHAPE_SIZE> = (0..c_len)
            .map(|_| (0..r_len).map(|_| false).collect())
            .collect();
        for (r, cells) in self.rows.iter().enumerate() {
            for (c, &filled) in cells.iter().enumerate() {
                if filled {
                    rows[c][r_len - 1 - r] = true;
                }
            }
        }
        Self { rows }
    }

    /// Iterates the occupied cells as `(col, row)` offsets inside the bounding box.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, &filled)| filled.then_some((col, row)))
        })
    }
}

/// Applies `rotation` successive 90° clockwise turns to the kind's base matrix.
#[must_use]
pub fn rotated_occupancy(kind: PieceKind, rotation: Rotation) -> Occupancy {
    let mut occupancy = Occupancy::from_blocks(kind.shape().blocks());
    for _ in 0..rotation.quarter_turns() {
        occupancy = occupancy.rotated_clockwise();
    }
    occupancy
}

/// Returns every occupied cell of `kind` at `rotation`, offset by the bounding-box origin `(x, y)`.
///
/// All collision, locking, and rendering derive piece positions from here.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn occupied_cells(kind: PieceKind, x: i32, y: i32, rotation: Rotation) -> PieceCells {
    rotated_occupancy(kind, rotation)
        .occupied()
        .map(|(col, row)| (x + col as i32, y + row as i32))
        .collect()
}

/// A piece at a specific location and orientation.
///
/// Used both for the falling piece under player control and for the ghost
/// (landing preview). Values are immutable: movement and rotation return new
/// `ActivePiece` instances.
///
/// # Coordinate System
///
/// - `(x, y)` is the top-left corner of the piece's bounding box
/// - X increases rightward (columns), Y increases downward (rows)
/// - `y` may be negative while the piece projects above the grid
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, PieceKind, Rotation};
///
/// let piece = ActivePiece::new(PieceKind::T, 4, 0, Rotation::SPAWN);
/// let moved = piece.shifted(1, 0);
/// let rotated = moved.with_rotation(moved.rotation().clockwise());
/// assert_eq!(rotated.x(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    kind: PieceKind,
    x: i32,
    y: i32,
    rotation: Rotation,
}

impl ActivePiece {
    #[must_use]
    pub const fn new(kind: PieceKind, x: i32, y: i32, rotation: Rotation) -> Self {
        Self {
            kind,
            x,
            y,
            rotation,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn occupancy(&self) -> Occupancy {
        rotated_occupancy(self.kind, self.rotation)
    }

    #[must_use]
    pub fn cells(&self) -> PieceCells {
        occupied_cells(self.kind, self.x, self.y, self.rotation)
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    #[must_use]
    pub const fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    /// Returns this piece moved straight down to the deepest row it can legally occupy.
    ///
    /// The search starts at the current row and never passes the grid height.
    #[must_use]
    pub fn drop_position(self, playfield: &Playfield) -> Self {
        let mut y = self.y;
        while y < Playfield::HEIGHT_I32
            && playfield.fits(self.kind, self.x, y + 1, self.rotation)
        {
            y += 1;
        }
        Self { y, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceError {
    #[display("expected format 'kind#rotation@x,y', got '{_0}'")]
    Format(#[error(not(source))] String),
    #[display("invalid piece kind")]
    Kind(ParsePieceKindError),
    #[display("rotation must be 0-3, got '{_0}'")]
    Rotation(#[error(not(source))] String),
    #[display("invalid coordinate: '{_0}'")]
    Coordinate(#[error(not(source))] String),
}

/// Compact notation: `"kind#rotation@x,y"`, e.g. `"I#1@-2,16"`.
impl fmt::Display for ActivePiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.x,
            self.y
        )
    }
}

impl FromStr for ActivePiece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || ParsePieceError::Format(s.to_owned());

        let (kind_str, rest) = s.split_once('#').ok_or_else(format_err)?;
        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(format_err)?;
        let (x_str, y_str) = position_str.split_once(',').ok_or_else(format_err)?;

        let kind = kind_str.parse().map_err(ParsePieceError::Kind)?;
        let rotation = rotation_str
            .parse::<u8>()
            .ok()
            .filter(|r| *r < 4)
            .map(Rotation)
            .ok_or_else(|| ParsePieceError::Rotation(rotation_str.to_owned()))?;
        let x = x_str
            .parse()
            .map_err(|_| ParsePieceError::Coordinate(x_str.to_owned()))?;
        let y = y_str
            .parse()
            .map_err(|_| ParsePieceError::Coordinate(y_str.to_owned()))?;

        Ok(Self::new(kind, x, y, rotation))
    }
}

impl Serialize for ActivePiece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ActivePiece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
