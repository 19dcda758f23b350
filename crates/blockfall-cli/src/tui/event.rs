use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone)]
pub(super) enum TuiEvent {
    /// Time-driven update, carrying the wall time since the previous tick.
    Tick(Duration),
    /// Screen render timing.
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(CrosstermEvent),
}
