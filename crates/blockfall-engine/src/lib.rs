//! Rules engine for a single-player falling-block puzzle game.
//!
//! The crate is split in two layers:
//!
//! - [`core`] holds the static piece table, the rotation geometry, and the
//!   10×20 [`Playfield`] grid.
//! - [`engine`] holds the piece supply ([`NextQueue`]), scoring
//!   ([`GameStats`]), the pure state transitions on [`GameState`], and the
//!   timer-driven [`GameSession`] wrapper.
//!
//! Every transition takes a state by reference and returns a new one, or
//! `None` when the request has no effect. Nothing here reads a clock, touches
//! the terminal, or does I/O; those concerns belong to the front end.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Direction, GameState, PieceSeed};
//!
//! let state = GameState::with_seed(PieceSeed::from_bytes([3; 16]));
//! let moved = state.move_piece(Direction::Left, false).unwrap_or_else(|| state.clone());
//! assert!(moved.is_playing());
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
