use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

const DEFAULT_RENDER_INTERVAL: Duration = Duration::from_millis(16);

/// Schedules ticks, throttled renders, and terminal events.
///
/// A render is issued only after something changed (a tick or a terminal
/// event) and no sooner than one render interval after the previous render.
/// Without a tick interval, no tick events are generated.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_interval: Duration,
    last_tick: Instant,
    last_render: Option<Instant>,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self {
            tick_interval: None,
            render_interval: DEFAULT_RENDER_INTERVAL,
            last_tick: Instant::now(),
            last_render: None,
            dirty: true,
        }
    }

    /// Sets the tick interval. Pass `None` to disable tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    /// Sets the minimum spacing between two renders.
    pub(super) fn set_render_interval(&mut self, interval: Duration) {
        self.render_interval = interval;
    }

    /// Restarts the tick clock, so that time spent before the loop starts is not reported.
    pub(super) fn reset_clock(&mut self) {
        self.last_tick = Instant::now();
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick or render is due or a crossterm event occurs.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(elapsed) = self.tick_due(now) {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick(elapsed));
            }

            if self.render_due(now) {
                self.last_render = Some(now);
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(TuiEvent::Crossterm(event::read()?));
        }
    }

    /// Time since the last tick, if a tick is due at `now`.
    fn tick_due(&self, now: Instant) -> Option<Duration> {
        let interval = self.tick_interval?;
        let elapsed = now.duration_since(self.last_tick);
        (elapsed >= interval).then_some(elapsed)
    }

    fn render_due(&self, now: Instant) -> bool {
        self.dirty
            && self
                .last_render
                .is_none_or(|last| now.duration_since(last) >= self.render_interval)
    }

    /// How long to wait for terminal input before the next tick or render is due.
    fn timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = self
            .dirty
            .then(|| self.last_render.map_or(now, |last| last + self.render_interval));
        let next_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_at.saturating_duration_since(now))
    }
}
