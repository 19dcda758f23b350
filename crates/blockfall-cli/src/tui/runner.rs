use std::{io, time::Duration};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::DefaultTerminal;

use crate::tui::{
    App,
    event::TuiEvent,
    event_loop::EventLoop,
};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    /// Creates a new Tui.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events
            .set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    /// Caps the render rate (Hz, frames per second).
    pub fn set_render_rate(&mut self, rate: f64) {
        self.events
            .set_render_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - `TuiEvent::Tick`: calls `app.update()` with the elapsed time
    ///    - `TuiEvent::Render`: calls `app.draw()`
    ///    - `TuiEvent::Crossterm`: calls `app.handle_event()`
    ///
    /// Where the terminal supports it, key repeat and release events are
    /// requested so that held keys can be told apart from fresh presses.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            let enhanced = supports_keyboard_enhancement().unwrap_or(false);
            if enhanced {
                execute!(
                    io::stdout(),
                    PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
                )?;
            }

            let result = self.event_loop(terminal, app);

            if enhanced {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            }
            result
        })
    }

    fn event_loop<A>(&mut self, terminal: &mut DefaultTerminal, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        self.events.reset_clock();
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick(elapsed) => {
                    app.update(self, elapsed);
                }
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => {
                    app.handle_event(self, event);
                }
            }
        }
        Ok(())
    }
}
