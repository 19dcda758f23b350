use super::{
    piece::{ActivePiece, Rotation, occupied_cells},
    shape::PieceKind,
};

/// Content of a single grid cell: the kind that was locked there, or `None` when empty.
pub type Cell = Option<PieceKind>;

type Row = [Cell; Playfield::WIDTH];

const EMPTY_ROW: Row = [None; Playfield::WIDTH];

/// The 10×20 grid of locked cells.
///
/// Row 0 is the top of the visible grid, row 19 the bottom. Cells above row 0
/// are not stored: pieces may project there, but locking drops them.
///
/// `Playfield` is a plain value. Locking and line clearing return a new grid and
/// leave the receiver untouched, so a state holding the old grid never observes
/// the change.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, PieceKind, Playfield, Rotation};
///
/// let piece = ActivePiece::new(PieceKind::O, 0, 18, Rotation::SPAWN);
/// let locked = Playfield::EMPTY.lock(piece);
///
/// assert_eq!(locked.cell(0, 19), Some(Some(PieceKind::O)));
/// assert_eq!(Playfield::EMPTY.cell(0, 19), Some(None));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Playfield {
    rows: [Row; Playfield::HEIGHT],
}

impl Default for Playfield {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Playfield {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;

    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const WIDTH_I32: i32 = Self::WIDTH as i32;
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const HEIGHT_I32: i32 = Self::HEIGHT as i32;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; Self::HEIGHT],
    };

    /// Returns the cell at `(col, row)`, or `None` when the position is outside the grid.
    #[must_use]
    pub fn cell(&self, col: i32, row: i32) -> Option<Cell> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        self.rows.get(row)?.get(col).copied()
    }

    /// Iterates the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; Self::WIDTH]> {
        self.rows.iter()
    }

    /// Iterates every locked cell as `((col, row), kind)`.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn occupied_cells(&self) -> impl Iterator<Item = ((i32, i32), PieceKind)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.map(|kind| ((col as i32, row as i32), kind))
            })
        })
    }

    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| cell.is_none()).count()
    }

    /// Checks whether `kind` at `(x, y, rotation)` is a legal placement.
    ///
    /// Every occupied cell must have a column in `0..WIDTH` and a row below
    /// `HEIGHT`. Rows above the grid (negative) are always legal; rows inside the
    /// grid must be empty.
    #[must_use]
    pub fn fits(&self, kind: PieceKind, x: i32, y: i32, rotation: Rotation) -> bool {
        occupied_cells(kind, x, y, rotation)
            .into_iter()
            .all(|(col, row)| {
                if !(0..Self::WIDTH_I32).contains(&col) || row >= Self::HEIGHT_I32 {
                    return false;
                }
                row < 0 || self.cell(col, row) == Some(None)
            })
    }

    #[must_use]
    pub fn fits_piece(&self, piece: ActivePiece) -> bool {
        self.fits(piece.kind(), piece.x(), piece.y(), piece.rotation())
    }

    /// Returns a copy of the grid with `piece` written into it.
    ///
    /// Cells outside the grid (in particular those above row 0) are dropped.
    #[must_use]
    pub fn lock(&self, piece: ActivePiece) -> Self {
        let mut locked = *self;
        for (col, row) in piece.cells() {
            let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) else {
                continue;
            };
            if let Some(cell) = locked.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
                *cell = Some(piece.kind());
            }
        }
        locked
    }

    /// Removes every full row and returns the compacted grid with the number of rows removed.
    ///
    /// Remaining rows keep their order and settle to the bottom; empty rows fill
    /// the top so the height stays fixed.
    #[must_use]
    pub fn clear_full_lines(&self) -> (Self, usize) {
        let mut rows = self.rows;
        let mut count = 0;
        for y in (0..Self::HEIGHT).rev() {
            if rows[y].iter().all(Option::is_some) {
                count += 1;
                continue;
            }
            if count > 0 {
                rows[y + count] = rows[y];
            }
        }
        rows[..count].fill(EMPTY_ROW);
        (Self { rows }, count)
    }

    /// Creates a `Playfield` from ASCII art, for tests and puzzle setups.
    ///
    /// Each line is one row of exactly 10 cells: `.` is empty and a piece letter
    /// (`I O T S Z J L`) is a locked cell of that kind. Whitespace is ignored.
    /// Lines are aligned to the bottom of the grid, so the last line is row 19.
    ///
    /// # Panics
    ///
    /// Panics on a row of the wrong width, an unknown character, or more than 20 rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= Self::HEIGHT,
            "at most {} rows allowed, got {}",
            Self::HEIGHT,
            lines.len()
        );

        let mut playfield = Self::EMPTY;
        let top = Self::HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<Cell> = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| match c {
                    '.' => None,
                    _ => Some(
                        PieceKind::from_char(c)
                            .unwrap_or_else(|| panic!("unknown cell {c:?} at row {i}")),
                    ),
                })
                .collect();
            assert_eq!(
                cells.len(),
                Self::WIDTH,
                "Each row must have exactly {} cells, got {} at row {}",
                Self::WIDTH,
                cells.len(),
                i
            );
            playfield.rows[top + i].copy_from_slice(&cells);
        }
        playfield
    }
}
