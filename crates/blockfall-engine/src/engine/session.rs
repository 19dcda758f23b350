use std::time::Duration;

use super::{
    game_state::{Direction, GameState, RotationDirection},
    next_queue::PieceSeed,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A discrete player request, after key-repeat filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Move(Direction),
    Rotate(RotationDirection),
    Flip,
}

/// Auto-drop period at `level`: 1000 ms minus 50 ms per level, never below 100 ms.
#[must_use]
pub fn drop_interval(level: usize) -> Duration {
    const BASE_MILLIS: usize = 1000;
    const STEP_MILLIS: usize = 50;
    const MIN_MILLIS: usize = 100;
    let millis = BASE_MILLIS
        .saturating_sub(level.saturating_mul(STEP_MILLIS))
        .max(MIN_MILLIS);
    Duration::from_millis(millis as u64)
}

/// Owner of the single mutable game-state slot.
///
/// The session applies the results of [`GameState`] transitions, discards
/// rejected ones, and sequences the post-move lock check after every
/// downward step. It also runs the gravity clock, but only from the elapsed
/// time handed to [`Self::advance`]: it never reads a clock itself.
#[derive(Debug, Clone)]
pub struct GameSession {
    state: GameState,
    session_state: SessionState,
    drop_elapsed: Duration,
    play_time: Duration,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(GameState::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_state(GameState::with_seed(seed))
    }

    #[must_use]
    pub fn with_top_score(top_score: usize) -> Self {
        Self::with_state(GameState::with_top_score(top_score))
    }

    #[must_use]
    pub fn with_state(state: GameState) -> Self {
        let session_state = if state.is_game_over() {
            SessionState::GameOver
        } else {
            SessionState::Playing
        };
        Self {
            state,
            session_state,
            drop_elapsed: Duration::ZERO,
            play_time: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Time spent in the `Playing` state since the game started.
    #[must_use]
    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        drop_interval(self.state.level())
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver, // No change from game over
        };
    }

    /// Replaces the game with a fresh one, keeping the top score.
    pub fn restart(&mut self) {
        *self = Self::with_state(self.state.restart());
    }

    /// Feeds `elapsed` wall time to the gravity clock.
    ///
    /// Performs at most one gravity step per call, once the accumulated time
    /// reaches the drop interval of the current level. Any backlog of a whole
    /// further interval is discarded. Returns `true` if the state changed.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.session_state.is_playing() {
            return false;
        }
        self.play_time += elapsed;
        self.drop_elapsed += elapsed;

        let interval = self.drop_interval();
        if self.drop_elapsed < interval {
            return false;
        }
        self.drop_elapsed -= interval;
        if self.drop_elapsed >= interval {
            self.drop_elapsed = Duration::ZERO;
        }
        self.replace(self.state.soft_drop())
    }

    /// Applies one player intent. Returns `true` if the state changed.
    ///
    /// Intents are ignored while paused or after game over.
    pub fn apply(&mut self, intent: Intent) -> bool {
        if !self.session_state.is_playing() {
            return false;
        }
        let next = match intent {
            Intent::Move(Direction::Down) => self.state.soft_drop(),
            Intent::Move(direction) => self.state.move_piece(direction, false),
            Intent::Rotate(direction) => self.state.rotate(direction),
            Intent::Flip => self.state.flip(),
        };
        self.replace(next)
    }

    fn replace(&mut self, next: Option<GameState>) -> bool {
        let Some(next) = next else {
            return false;
        };
        self.state = next;
        if self.state.is_game_over() {
            self.session_state = SessionState::GameOver;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::core::Playfield;

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([0x21; 16]);

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn blocked_spawn() -> Playfield {
        Playfield::from_ascii(&format!(
            "...ZZZZ...\n...ZZZZ...\n{}",
            "..........\n".repeat(18)
        ))
    }

    #[test]
    fn test_drop_interval() {
        assert_eq!(drop_interval(1), millis(950));
        assert_eq!(drop_interval(2), millis(900));
        assert_eq!(drop_interval(18), millis(100));
        assert_eq!(drop_interval(19), millis(100));
        assert_eq!(drop_interval(usize::MAX), millis(100));
    }

    #[test]
    fn test_advance_drops_on_interval() {
        let mut session = GameSession::with_seed(SEED);
        let start = session.state().current_piece().unwrap();

        assert!(!session.advance(millis(949)));
        assert_eq!(session.state().current_piece(), Some(start));

        assert!(session.advance(millis(1)));
        assert_eq!(session.state().current_piece(), Some(start.shifted(0, 1)));

        // A partial interval carries over to the next call.
        assert!(!session.advance(millis(900)));
        assert!(session.advance(millis(50)));
        assert_eq!(session.state().current_piece(), Some(start.shifted(0, 2)));
        assert_eq!(session.play_time(), millis(950 * 2));
    }

    #[test]
    fn test_long_stall_drops_one_row() {
        let mut session = GameSession::with_seed(SEED);
        let start = session.state().current_piece().unwrap();

        assert!(session.advance(Duration::from_secs(120)));
        assert!(session.session_state().is_playing());
        assert_eq!(session.state().stats().completed_pieces(), 0);
        assert_eq!(session.state().current_piece(), Some(start.shifted(0, 1)));
        assert_eq!(session.play_time(), Duration::from_secs(120));

        // The backlog is gone: the next drop needs a fresh interval.
        assert!(!session.advance(millis(949)));
        assert!(session.advance(millis(1)));
        assert_eq!(session.state().current_piece(), Some(start.shifted(0, 2)));
    }

    #[test]
    fn test_gravity_locks_on_landing() {
        let mut session = GameSession::with_seed(SEED);
        let first = *session.state().next_pieces();
        for _ in 0..19 {
            session.advance(millis(950));
        }
        // Every kind reaches the floor within 19 steps and locks on arrival.
        assert_eq!(session.state().stats().completed_pieces(), 1);
        assert_eq!(session.state().current_piece().unwrap().kind(), first[0]);
    }

    #[test]
    fn test_pause_stops_clock_and_input() {
        let mut session = GameSession::with_seed(SEED);
        let before = session.state().clone();

        session.toggle_pause();
        assert!(session.session_state().is_paused());
        assert!(!session.advance(millis(5000)));
        assert!(!session.apply(Intent::Move(Direction::Left)));
        assert!(!session.apply(Intent::Flip));
        assert_eq!(session.state(), &before);
        assert_eq!(session.play_time(), Duration::ZERO);

        session.toggle_pause();
        assert!(session.session_state().is_playing());
        assert!(session.apply(Intent::Move(Direction::Left)));
    }

    #[test]
    fn test_apply_intents() {
        let mut session = GameSession::with_seed(SEED);
        let start = session.state().current_piece().unwrap();

        assert!(session.apply(Intent::Move(Direction::Right)));
        assert_eq!(session.state().current_piece(), Some(start.shifted(1, 0)));
        assert!(session.apply(Intent::Move(Direction::Down)));
        assert_eq!(session.state().current_piece(), Some(start.shifted(1, 1)));
        assert!(session.apply(Intent::Flip));
        assert_eq!(
            session.state().current_piece().unwrap().rotation(),
            start.rotation().half_turn()
        );
    }

    #[test]
    fn test_rejected_intent_keeps_state() {
        let mut session = GameSession::with_seed(SEED);
        while session.apply(Intent::Move(Direction::Left)) {}
        let at_wall = session.state().clone();
        assert!(!session.apply(Intent::Move(Direction::Left)));
        assert_eq!(session.state(), &at_wall);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut session = GameSession::with_state(GameState::with_playfield(
            SEED,
            blocked_spawn(),
            300,
        ));
        assert!(session.session_state().is_game_over());
        assert!(!session.advance(millis(5000)));
        assert!(!session.apply(Intent::Rotate(RotationDirection::Clockwise)));

        session.toggle_pause();
        assert!(session.session_state().is_game_over());

        session.restart();
        assert!(session.session_state().is_playing());
        assert_eq!(session.state().top_score(), 300);
        assert_eq!(session.state().score(), 0);
    }

    #[test]
    fn test_reaching_game_over_through_gravity() {
        let mut session = GameSession::with_seed(SEED);
        let mut steps = 0;
        while session.session_state().is_playing() {
            session.advance(session.drop_interval());
            steps += 1;
            assert!(steps < 10_000, "stack never topped out");
        }
        assert!(session.session_state().is_game_over());
        assert!(session.state().is_game_over());
        assert_eq!(session.state().current_piece(), None);
    }
}
