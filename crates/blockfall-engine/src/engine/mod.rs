//! Game rules and state transitions.
//!
//! This module composes the [`core`](crate::core) data structures into whole-game
//! behavior:
//!
//! - [`NextQueue`] - Upcoming pieces, drawn uniformly at random from a seeded generator
//! - [`GameStats`] - Score, lines, level, and top score
//! - [`GameState`] - Immutable game state and its transitions (move, rotate, flip, lock)
//! - [`GameSession`] - Owner of the current state, with pause and the gravity clock
//!
//! # Game Flow
//!
//! 1. Create a [`GameState`] (or a [`GameSession`] around one)
//! 2. Apply transitions; each returns a new state or `None` when rejected
//! 3. After a successful downward step, check whether the piece has landed and lock it
//! 4. Locking clears full lines, scores, and spawns the next piece
//! 5. Repeat until a freshly spawned piece collides with the stack
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Direction, GameSession, Intent, PieceSeed};
//! use std::time::Duration;
//!
//! let mut session = GameSession::with_seed(PieceSeed::from_bytes([9; 16]));
//! session.apply(Intent::Move(Direction::Left));
//! session.advance(Duration::from_millis(950));
//!
//! assert!(session.session_state().is_playing());
//! assert_eq!(session.state().level(), 1);
//! ```

pub use self::{game_state::*, game_stats::*, next_queue::*, session::*};

mod game_state;
mod game_stats;
mod next_queue;
mod session;
