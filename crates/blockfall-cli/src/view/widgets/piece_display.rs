use blockfall_engine::{PieceKind, Rotation, rotated_occupancy};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{BlockDisplay, CellView};

/// Occupied cells of `kind` in spawn orientation, shifted so the tight box starts at the origin.
fn preview_cells(kind: PieceKind) -> Vec<(usize, usize)> {
    let cells: Vec<_> = rotated_occupancy(kind, Rotation::SPAWN).occupied().collect();
    let min_col = cells.iter().map(|&(col, _)| col).min().unwrap_or(0);
    let min_row = cells.iter().map(|&(_, row)| row).min().unwrap_or(0);
    cells
        .into_iter()
        .map(|(col, row)| (col - min_col, row - min_row))
        .collect()
}

fn preview_size(cells: &[(usize, usize)]) -> (u16, u16) {
    let extent = |f: fn(&(usize, usize)) -> usize| {
        cells
            .iter()
            .map(f)
            .max()
            .map_or(0, |max| u16::try_from(max + 1).unwrap_or(u16::MAX))
    };
    (extent(|c| c.0), extent(|c| c.1))
}

#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
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
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let cells = self.piece.map(preview_cells).unwrap_or_default();
        let (cols, rows) = preview_size(&cells);
        let piece_area = area.centered(
            Constraint::Length(cols * BlockDisplay::width()),
            Constraint::Length(rows * BlockDisplay::height()),
        );

        let col_constraints = (0..cols).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..rows).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let empty_block = BlockDisplay::from_cell(CellView::Empty, false);
        let Some(piece) = self.piece else {
            return;
        };
        let occupied_block = BlockDisplay::from_cell(CellView::Piece(piece), false);
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                if cells.contains(&(x, y)) {
                    Widget::render(&occupied_block, grid_cell, buf);
                } else {
                    Widget::render(&empty_block, grid_cell, buf);
                }
            }
        }
    }
}
