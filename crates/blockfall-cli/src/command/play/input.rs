use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use blockfall_engine::{Direction, Intent, RotationDirection};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Delay after a press before a held movement key starts repeating.
pub const INITIAL_DELAY: Duration = Duration::from_millis(200);
/// Minimum spacing between repeats of a held movement key.
pub const REPEAT_INTERVAL: Duration = Duration::from_millis(50);

/// What a key does in the play screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::From)]
pub enum Action {
    Play(Intent),
    TogglePause,
    Restart,
    Quit,
}

impl Action {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        let action = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Self::Quit,
            KeyCode::Left => Intent::Move(Direction::Left).into(),
            KeyCode::Right => Intent::Move(Direction::Right).into(),
            KeyCode::Down => Intent::Move(Direction::Down).into(),
            KeyCode::Up => Intent::Rotate(RotationDirection::Clockwise).into(),
            KeyCode::Enter => Self::Restart,
            KeyCode::Esc => Self::Quit,
            KeyCode::Char(c) => return Self::from_char(c.to_ascii_lowercase()),
            _ => return None,
        };
        Some(action)
    }

    fn from_char(c: char) -> Option<Self> {
        let action = match c {
            'a' => Intent::Move(Direction::Left).into(),
            'd' => Intent::Move(Direction::Right).into(),
            's' => Intent::Move(Direction::Down).into(),
            'w' | 'x' => Intent::Rotate(RotationDirection::Clockwise).into(),
            'z' => Intent::Rotate(RotationDirection::CounterClockwise).into(),
            'f' => Intent::Flip.into(),
            'p' => Self::TogglePause,
            'r' => Self::Restart,
            'q' => Self::Quit,
            _ => return None,
        };
        Some(action)
    }

    /// Whether holding the key keeps triggering the action.
    pub fn repeats(self) -> bool {
        matches!(self, Self::Play(Intent::Move(_)))
    }
}

#[derive(Debug, Clone, Copy)]
struct Hold {
    next_fire: Instant,
}

/// Filters key events so that held keys repeat at a controlled rate.
///
/// A press always fires. A held movement key waits [`INITIAL_DELAY`], then
/// repeats every [`REPEAT_INTERVAL`], so the first repeat lands one interval
/// after the delay runs out. Other actions never repeat. Releases end the hold.
///
/// Terminals that do not report repeat and release events deliver every
/// auto-repeat as a press, so the terminal's own repeat rate applies there.
#[derive(Debug, Default)]
pub struct RepeatGate {
    holds: HashMap<Action, Hold>,
}

impl RepeatGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether an event of `kind` for `action` at `now` should be acted on.
    pub fn accept(&mut self, action: Action, kind: KeyEventKind, now: Instant) -> bool {
        match kind {
            KeyEventKind::Press => {
                self.holds.insert(
                    action,
                    Hold {
                        next_fire: now + INITIAL_DELAY + REPEAT_INTERVAL,
                    },
                );
                true
            }
            KeyEventKind::Repeat => {
                if !action.repeats() {
                    return false;
                }
                // A repeat without a recorded press is treated as already held.
                let hold = self.holds.entry(action).or_insert(Hold { next_fire: now });
                if now < hold.next_fire {
                    return false;
                }
                hold.next_fire = now + REPEAT_INTERVAL;
                true
            }
            KeyEventKind::Release => {
                self.holds.remove(&action);
                false
            }
        }
    }
}
