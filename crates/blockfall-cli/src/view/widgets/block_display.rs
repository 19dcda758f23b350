use blockfall_engine::PieceKind;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::view::widgets::style;

/// What a single grid cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Empty,
    Ghost(PieceKind),
    Piece(PieceKind),
}

#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: CellView, show_dots: bool) -> Self {
        match cell {
            CellView::Empty => {
                if show_dots {
                    Self::new(style::EMPTY_DOT, ".")
                } else {
                    Self::new(style::EMPTY, "")
                }
            }
            CellView::Ghost(kind) => Self::new(style::ghost(kind), "[]"),
            CellView::Piece(kind) => Self::new(style::piece(kind), ""),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
