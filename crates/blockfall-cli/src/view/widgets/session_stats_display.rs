use std::{iter, time::Duration};

use blockfall_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::style;

pub struct SessionStatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&GameSession) -> String),
    LabelValue(&'static str, &'static dyn Fn(&GameSession) -> String),
}

fn format_play_time(dur: Duration) -> String {
    format!(
        "{:0}:{:0>2}.{:0>2}",
        dur.as_secs() / 60,
        dur.as_secs() % 60,
        dur.subsec_millis() / 10
    )
}

/// Formats `n` with comma-separated groups of three digits.
fn format_score(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn cleared(session: &GameSession, lines: usize) -> String {
    session.state().stats().line_cleared_counter()[lines].to_string()
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|session| format_score(session.state().score())),
    Row::FullLabel("TOP:"),
    Row::FullValue(&|session| format_score(session.state().top_score())),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|session| format_play_time(session.play_time())),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|session| session.state().level().to_string()),
    Row::LabelValue("LINES:", &|session| session.state().lines().to_string()),
    Row::Empty,
    Row::LabelValue("PIECES:", &|session| {
        session.state().stats().completed_pieces().to_string()
    }),
    Row::LabelValue("SINGLES:", &|session| cleared(session, 1)),
    Row::LabelValue("DOUBLES:", &|session| cleared(session, 2)),
    Row::LabelValue("TRIPLES:", &|session| cleared(session, 3)),
    Row::LabelValue("QUADS:", &|session| cleared(session, 4)),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
