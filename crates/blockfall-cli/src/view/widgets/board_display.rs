use std::iter;

use blockfall_engine::{ActivePiece, Playfield};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::{BlockDisplay, CellView};

type Grid = [[CellView; Playfield::WIDTH]; Playfield::HEIGHT];

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    playfield: &'a Playfield,
    ghost: Option<ActivePiece>,
    current_piece: Option<ActivePiece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(playfield: &'a Playfield) -> Self {
        Self {
            playfield,
            ghost: None,
            current_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Option<ActivePiece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn current_piece(self, piece: Option<ActivePiece>) -> Self {
        Self {
            current_piece: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        10 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        20 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    /// Locked cells, then the ghost, then the current piece on top.
    fn grid(&self) -> Grid {
        let mut grid = [[CellView::Empty; Playfield::WIDTH]; Playfield::HEIGHT];
        for (grid_row, row) in iter::zip(&mut grid, self.playfield.rows()) {
            for (view, cell) in iter::zip(grid_row, row) {
                if let Some(kind) = cell {
                    *view = CellView::Piece(*kind);
                }
            }
        }
        if let Some(ghost) = self.ghost {
            paint(&mut grid, ghost, CellView::Ghost(ghost.kind()));
        }
        if let Some(piece) = self.current_piece {
            paint(&mut grid, piece, CellView::Piece(piece.kind()));
        }
        grid
    }
}

/// Writes `view` into every on-grid cell of `piece`. Rows above the grid are skipped.
fn paint(grid: &mut Grid, piece: ActivePiece, view: CellView) {
    for (col, row) in piece.cells() {
        let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) else {
            continue;
        };
        if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = view;
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..Playfield::WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..Playfield::HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<{ Playfield::HEIGHT }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ Playfield::WIDTH }>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.grid()) {
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                BlockDisplay::from_cell(cell, true).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{PieceKind, Rotation};

    use super::*;

    #[test]
    fn test_grid_layers() {
        let playfield = Playfield::from_ascii("ZZ........");
        let current = ActivePiece::new(PieceKind::O, 0, 0, Rotation::SPAWN);
        let ghost = current.drop_position(&playfield);
        let grid = BoardDisplay::new(&playfield)
            .ghost(Some(ghost))
            .current_piece(Some(current))
            .grid();

        assert_eq!(grid[19][0], CellView::Piece(PieceKind::Z));
        assert_eq!(grid[18][1], CellView::Ghost(PieceKind::O));
        assert_eq!(grid[0][0], CellView::Piece(PieceKind::O));
        assert_eq!(grid[19][2], CellView::Empty);
    }

    #[test]
    fn test_current_piece_covers_ghost() {
        let current = ActivePiece::new(PieceKind::O, 4, 18, Rotation::SPAWN);
        let grid = BoardDisplay::new(&Playfield::EMPTY)
            .ghost(Some(current))
            .current_piece(Some(current))
            .grid();
        assert_eq!(grid[19][5], CellView::Piece(PieceKind::O));
    }

    #[test]
    fn test_cells_above_grid_are_skipped() {
        let current = ActivePiece::new(PieceKind::I, 2, -2, Rotation::new(1));
        let grid = BoardDisplay::new(&Playfield::EMPTY)
            .current_piece(Some(current))
            .grid();
        let shown = grid.iter().flatten().filter(|c| **c != CellView::Empty).count();
        assert_eq!(shown, 2);
    }
}
