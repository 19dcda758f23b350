use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, piece_display::*, piece_stack_display::*,
    session_display::*, session_stats_display::*,
};

mod block_display;
mod board_display;
mod piece_display;
mod piece_stack_display;
mod session_display;
mod session_stats_display;

mod color {
    use blockfall_engine::Rgb;
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub const fn from_rgb(Rgb(r, g, b): Rgb) -> Color {
        Color::Rgb(r, g, b)
    }
}

pub mod style {
    use blockfall_engine::PieceKind;
    use ratatui::style::{Color, Style};

    use crate::view::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);

    /// Solid block in the kind's table color.
    pub fn piece(kind: PieceKind) -> Style {
        bg_only(color::from_rgb(kind.color()))
    }

    /// Outline in the kind's table color, for the landing preview.
    pub fn ghost(kind: PieceKind) -> Style {
        fg_bg(color::from_rgb(kind.color()), color::BLACK)
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
