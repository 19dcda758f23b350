use std::time::{Duration, Instant};

use blockfall_engine::{GameSession, SessionState};
use crossterm::event::{Event, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    command::play::input::{Action, RepeatGate},
    tui::{App, Tui},
    view::widgets::SessionDisplay,
};

const FPS: f64 = 60.0;

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    repeat_gate: RepeatGate,
    show_ghost: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession, show_ghost: bool) -> Self {
        Self {
            session,
            repeat_gate: RepeatGate::new(),
            show_ghost,
            is_exiting: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn handle_key(&mut self, key: &KeyEvent, now: Instant) {
        let Some(action) = Action::from_key(key) else {
            return;
        };
        if !self.repeat_gate.accept(action, key.kind, now) {
            return;
        }
        match action {
            Action::Play(intent) => _ = self.session.apply(intent),
            Action::TogglePause => self.session.toggle_pause(),
            Action::Restart => self.session.restart(),
            Action::Quit => self.is_exiting = true,
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
        tui.set_render_rate(FPS);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        if let Some(key) = event.as_key_event() {
            self.handle_key(&key, Instant::now());
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session, self.show_ghost);
        let help_text = match self.session.session_state() {
            SessionState::Playing => {
                "Controls: ← → (Move) | ↓ (Down) | ↑ X (Rotate) | Z (Rotate Left) | F (Flip) | P (Pause) | R (Restart) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | R (Restart) | Q (Quit)",
            SessionState::GameOver => "Controls: R / Enter (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(24), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        self.session.advance(elapsed);
    }
}
