use crate::core::{ActivePiece, PieceCells, PieceKind, Playfield};

use super::{
    game_stats::GameStats,
    next_queue::{NextQueue, PieceSeed, spawn},
};

/// Offsets tried, in order, when a rotation's target position is illegal.
///
/// The same list applies to every kind and every rotation transition. The
/// in-place attempt comes first and the single upward kick last.
pub const ROTATION_KICKS: [(i32, i32); 6] = [(0, 0), (-1, 0), (1, 0), (-2, 0), (2, 0), (0, -1)];

/// Horizontal offsets tried, in order, for a half-turn.
pub const FLIP_KICKS: [i32; 5] = [0, -1, 1, -2, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Returns `piece` moved straight down to the deepest row it can legally occupy.
///
/// Pure function of its inputs: calling it twice on the same pair gives the same piece.
#[must_use]
pub fn ghost(playfield: &Playfield, piece: ActivePiece) -> ActivePiece {
    piece.drop_position(playfield)
}

/// Complete, immutable state of one game.
///
/// Every transition borrows the state and returns a brand-new one, or `None`
/// when the request has no observable effect (illegal move, rotation with
/// every kick blocked, or any request after game over). The caller owns the
/// single "current state" slot and decides whether to replace it.
///
/// Invariants:
///
/// - The current piece is absent exactly when the game is over.
/// - The ghost, when present, shares the current piece's kind, column, and
///   rotation, and sits at or below it.
/// - `top_score` never decreases, including across [`Self::restart`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{Direction, GameState, PieceSeed, RotationDirection};
///
/// let state = GameState::with_seed(PieceSeed::from_bytes([1; 16]));
/// let state = state.rotate(RotationDirection::Clockwise).unwrap_or_else(|| state.clone());
/// let state = state.move_piece(Direction::Left, false).unwrap_or_else(|| state.clone());
///
/// let ghost = state.ghost_piece().unwrap();
/// let current = state.current_piece().unwrap();
/// assert_eq!((ghost.kind(), ghost.x()), (current.kind(), current.x()));
/// assert!(ghost.y() >= current.y());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    playfield: Playfield,
    current_piece: Option<ActivePiece>,
    ghost_piece: Option<ActivePiece>,
    hold_piece: Option<PieceKind>,
    next_queue: NextQueue,
    stats: GameStats,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a fresh game: empty playfield, level 1, first piece spawned.
    #[must_use]
    pub fn new() -> Self {
        Self::with_top_score(0)
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_playfield(seed, Playfield::EMPTY, 0)
    }

    /// Like [`Self::new`], but carrying `top_score` from an earlier game.
    #[must_use]
    pub fn with_top_score(top_score: usize) -> Self {
        Self::spawn_next(
            Playfield::EMPTY,
            &NextQueue::new(),
            None,
            GameStats::with_top_score(top_score),
        )
    }

    /// Starts a game on a prepared playfield.
    ///
    /// Rows that are already full are removed first, without scoring, so a
    /// single lock never clears more than four lines. The game is over
    /// immediately if the first piece cannot be placed.
    #[must_use]
    pub fn with_playfield(seed: PieceSeed, playfield: Playfield, top_score: usize) -> Self {
        let (playfield, _) = playfield.clear_full_lines();
        Self::spawn_next(
            playfield,
            &NextQueue::with_seed(seed),
            None,
            GameStats::with_top_score(top_score),
        )
    }

    /// Returns a fresh game that keeps this game's top score.
    #[must_use]
    pub fn restart(&self) -> Self {
        Self::with_top_score(self.stats.top_score())
    }

    fn spawn_next(
        playfield: Playfield,
        queue: &NextQueue,
        hold_piece: Option<PieceKind>,
        stats: GameStats,
    ) -> Self {
        let spawned = spawn(queue, &playfield);
        if spawned.game_over {
            // The queue is left as it was before the failed spawn.
            return Self {
                playfield,
                current_piece: None,
                ghost_piece: None,
                hold_piece,
                next_queue: queue.clone(),
                stats,
            };
        }
        Self {
            playfield,
            current_piece: Some(spawned.piece),
            ghost_piece: Some(ghost(&playfield, spawned.piece)),
            hold_piece,
            next_queue: spawned.queue,
            stats,
        }
    }

    fn with_current_piece(&self, piece: ActivePiece) -> Self {
        Self {
            current_piece: Some(piece),
            ghost_piece: Some(ghost(&self.playfield, piece)),
            ..self.clone()
        }
    }

    #[must_use]
    pub const fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    #[must_use]
    pub const fn current_piece(&self) -> Option<ActivePiece> {
        self.current_piece
    }

    #[must_use]
    pub const fn ghost_piece(&self) -> Option<ActivePiece> {
        self.ghost_piece
    }

    #[must_use]
    pub const fn hold_piece(&self) -> Option<PieceKind> {
        self.hold_piece
    }

    #[must_use]
    pub const fn next_pieces(&self) -> &[PieceKind; NextQueue::LEN] {
        self.next_queue.pieces()
    }

    #[must_use]
    pub const fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub const fn lines(&self) -> usize {
        self.stats.lines()
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub const fn top_score(&self) -> usize {
        self.stats.top_score()
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.current_piece.is_none()
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.current_piece.is_some()
    }

    /// Cells of the current piece; empty after game over.
    #[must_use]
    pub fn current_cells(&self) -> PieceCells {
        self.current_piece
            .map(|piece| piece.cells())
            .unwrap_or_default()
    }

    /// Cells of the ghost piece; empty after game over.
    #[must_use]
    pub fn ghost_cells(&self) -> PieceCells {
        self.ghost_piece
            .map(|piece| piece.cells())
            .unwrap_or_default()
    }

    /// Shifts the current piece one step in `direction`.
    ///
    /// When a downward step is blocked and `lock_on_failure` is set, the piece
    /// is locked instead. Any other blocked step returns `None`.
    #[must_use]
    pub fn move_piece(&self, direction: Direction, lock_on_failure: bool) -> Option<Self> {
        let piece = self.current_piece?;
        let (dx, dy) = direction.offset();
        let moved = piece.shifted(dx, dy);
        if self.playfield.fits_piece(moved) {
            return Some(self.with_current_piece(moved));
        }
        if direction == Direction::Down && lock_on_failure {
            return self.lock();
        }
        None
    }

    /// Turns the current piece a quarter turn, trying each of [`ROTATION_KICKS`] in order.
    #[must_use]
    pub fn rotate(&self, direction: RotationDirection) -> Option<Self> {
        let piece = self.current_piece?;
        let rotation = match direction {
            RotationDirection::Clockwise => piece.rotation().clockwise(),
            RotationDirection::CounterClockwise => piece.rotation().counter_clockwise(),
        };
        let turned = piece.with_rotation(rotation);
        ROTATION_KICKS
            .iter()
            .map(|&(dx, dy)| turned.shifted(dx, dy))
            .find(|candidate| self.playfield.fits_piece(*candidate))
            .map(|candidate| self.with_current_piece(candidate))
    }

    /// Turns the current piece half a turn, trying each of [`FLIP_KICKS`] in order.
    #[must_use]
    pub fn flip(&self) -> Option<Self> {
        let piece = self.current_piece?;
        let turned = piece.with_rotation(piece.rotation().half_turn());
        FLIP_KICKS
            .iter()
            .map(|&dx| turned.shifted(dx, 0))
            .find(|candidate| self.playfield.fits_piece(*candidate))
            .map(|candidate| self.with_current_piece(candidate))
    }

    /// Locks the current piece where it is, clears full lines, scores, and spawns the next piece.
    ///
    /// If the next piece cannot be placed, the returned state is game over. It
    /// keeps the cleared playfield and the updated score.
    #[must_use]
    pub fn lock(&self) -> Option<Self> {
        let piece = self.current_piece?;
        let (playfield, cleared) = self.playfield.lock(piece).clear_full_lines();
        let mut stats = self.stats.clone();
        stats.complete_piece_drop(cleared);
        Some(Self::spawn_next(
            playfield,
            &self.next_queue,
            self.hold_piece,
            stats,
        ))
    }

    /// Locks the current piece if it cannot move down one row.
    ///
    /// Drivers call this right after applying a successful downward move.
    #[must_use]
    pub fn check_and_lock(&self) -> Option<Self> {
        let piece = self.current_piece?;
        if self.playfield.fits_piece(piece.shifted(0, 1)) {
            return None;
        }
        self.lock()
    }

    /// One gravity step: move down (locking if blocked), then lock if the piece just landed.
    #[must_use]
    pub fn soft_drop(&self) -> Option<Self> {
        let piece = self.current_piece?;
        let moved = piece.shifted(0, 1);
        if !self.playfield.fits_piece(moved) {
            return self.lock();
        }
        let next = self.with_current_piece(moved);
        Some(next.check_and_lock().unwrap_or(next))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::core::Rotation;

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([0x5a; 16]);

    /// Builds a playing state with the given piece under control.
    fn state_with(playfield: Playfield, piece: ActivePiece) -> GameState {
        GameState {
            playfield,
            current_piece: Some(piece),
            ghost_piece: Some(ghost(&playfield, piece)),
            hold_piece: None,
            next_queue: NextQueue::with_seed(SEED),
            stats: GameStats::new(),
        }
    }

    fn assert_invariants(state: &GameState) {
        assert_eq!(state.current_piece.is_none(), state.is_game_over());
        assert_eq!(state.current_piece.is_some(), state.ghost_piece.is_some());
        if let (Some(current), Some(ghost)) = (state.current_piece, state.ghost_piece) {
            assert_eq!(ghost.kind(), current.kind());
            assert_eq!(ghost.x(), current.x());
            assert_eq!(ghost.rotation(), current.rotation());
            assert!(ghost.y() >= current.y());
            assert!(state.playfield.fits_piece(current));
            assert!(state.playfield.fits_piece(ghost));
            assert!(!state.playfield.fits_piece(ghost.shifted(0, 1)));
        }
        assert_eq!(state.level(), state.lines() / 10 + 1);
        assert!(state.top_score() >= state.score());
        assert_eq!(state.next_pieces().len(), NextQueue::LEN);
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::with_seed(SEED);
        assert_invariants(&state);
        assert!(state.is_playing());
        assert_eq!(state.score(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.hold_piece(), None);
        assert_eq!(state.playfield(), &Playfield::EMPTY);

        let queue = NextQueue::with_seed(SEED);
        let current = state.current_piece().unwrap();
        assert_eq!(current.kind(), queue.peek());
        assert_eq!(state.next_pieces()[..3], queue.pieces()[1..]);
        let ghost_bottom = state.ghost_cells().iter().map(|&(_, row)| row).max();
        assert_eq!(ghost_bottom, Some(19));
    }

    #[test]
    fn test_same_seed_same_game() {
        assert_eq!(GameState::with_seed(SEED), GameState::with_seed(SEED));
    }

    #[test]
    fn test_o_piece_lands_bottom_left() {
        let piece = ActivePiece::new(PieceKind::O, 4, 0, Rotation::SPAWN);
        let mut state = state_with(Playfield::EMPTY, piece);
        for _ in 0..4 {
            state = state.move_piece(Direction::Left, false).unwrap();
        }
        assert_eq!(state.move_piece(Direction::Left, false), None);

        let mut downs = 0;
        while let Some(next) = state.move_piece(Direction::Down, false) {
            state = next;
            downs += 1;
        }
        assert_eq!(downs, 18);
        assert_eq!(state.current_piece().unwrap().y(), 18);
        assert_eq!(state.ghost_piece(), state.current_piece());

        let locked = state.move_piece(Direction::Down, true).unwrap();
        assert_invariants(&locked);
        assert_eq!(locked.score(), 0);
        assert_eq!(locked.lines(), 0);
        assert_eq!(locked.level(), 1);
        assert_eq!(locked.stats().completed_pieces(), 1);
        assert_eq!(
            locked.playfield(),
            &Playfield::from_ascii(
                "
                OO........
                OO........
                "
            )
        );
    }

    #[test]
    fn test_vertical_i_clears_one_line() {
        let playfield = Playfield::from_ascii(
            "
            .JJJJJJJJJ
            ",
        );
        let piece = ActivePiece::new(PieceKind::I, -2, 16, Rotation::new(1));
        let state = state_with(playfield, piece);
        assert_eq!(state.ghost_piece(), Some(piece));

        let locked = state.lock().unwrap();
        assert_invariants(&locked);
        assert_eq!(locked.lines(), 1);
        assert_eq!(locked.score(), 100);
        assert_eq!(locked.top_score(), 100);
        assert_eq!(
            locked.playfield(),
            &Playfield::from_ascii(
                "
                I.........
                I.........
                I.........
                "
            )
        );
    }

    #[test]
    fn test_line_clear_scores_at_pre_lock_level() {
        let playfield = Playfield::from_ascii(".JJJJJJJJJ");
        let piece = ActivePiece::new(PieceKind::I, -2, 16, Rotation::new(1));
        let mut state = state_with(playfield, piece);
        for cleared in [4, 4, 1] {
            state.stats.complete_piece_drop(cleared);
        }
        assert_eq!(state.level(), 1);
        let score_before = state.score();

        // Line 10 lifts the level to 2, but this lock is still paid at level 1.
        let locked = state.lock().unwrap();
        assert_eq!(locked.lines(), 10);
        assert_eq!(locked.level(), 2);
        assert_eq!(locked.score(), score_before + 100);
    }

    #[test]
    fn test_rotation_kicks_off_left_wall() {
        // T pointing right, flush with the left wall.
        let piece = ActivePiece::new(PieceKind::T, -1, 5, Rotation::new(1));
        let state = state_with(Playfield::EMPTY, piece);
        let cells = piece.cells();
        assert_eq!(cells.iter().map(|&(col, _)| col).min(), Some(0));

        let rotated = state.rotate(RotationDirection::Clockwise).unwrap();
        assert_invariants(&rotated);
        assert_eq!(
            rotated.current_piece(),
            Some(ActivePiece::new(PieceKind::T, 0, 5, Rotation::new(2)))
        );
    }

    #[test]
    fn test_rotation_rejected_when_no_kick_fits() {
        let playfield = Playfield::from_ascii(
            "
            ..Z.......
            ..........
            ",
        );
        let piece = ActivePiece::new(PieceKind::T, -1, 17, Rotation::new(1));
        let state = state_with(playfield, piece);
        assert!(state.playfield().fits_piece(piece));
        assert_eq!(state.rotate(RotationDirection::Clockwise), None);
    }

    #[test]
    fn test_rotation_prefers_in_place() {
        let piece = ActivePiece::new(PieceKind::T, 4, 5, Rotation::SPAWN);
        let state = state_with(Playfield::EMPTY, piece);
        let rotated = state.rotate(RotationDirection::CounterClockwise).unwrap();
        assert_eq!(
            rotated.current_piece(),
            Some(piece.with_rotation(Rotation::new(3)))
        );
    }

    #[test]
    fn test_rotation_uses_upward_kick_last() {
        // Vertical I resting in a one-wide well; turning to horizontal only fits one row up.
        let playfield = Playfield::from_ascii(
            "
            ZZZZ.ZZZZZ
            ZZZZ.ZZZZZ
            ",
        );
        let piece = ActivePiece::new(PieceKind::I, 2, 16, Rotation::new(1));
        let state = state_with(playfield, piece);
        assert_eq!(piece.cells().as_slice(), &[(4, 16), (4, 17), (4, 18), (4, 19)]);

        // Rotation 2 puts the bar on box row 2 (playfield row 18).
        let rotated = state.rotate(RotationDirection::Clockwise).unwrap();
        assert_eq!(
            rotated.current_piece(),
            Some(ActivePiece::new(PieceKind::I, 2, 15, Rotation::new(2)))
        );
    }

    #[test]
    fn test_flip_in_place_and_with_kick() {
        let piece = ActivePiece::new(PieceKind::T, 4, 5, Rotation::SPAWN);
        let flipped = state_with(Playfield::EMPTY, piece).flip().unwrap();
        assert_eq!(
            flipped.current_piece(),
            Some(piece.with_rotation(Rotation::new(2)))
        );

        // Pointing right against the wall, the half turn needs one column of room.
        let piece = ActivePiece::new(PieceKind::T, -1, 5, Rotation::new(1));
        let flipped = state_with(Playfield::EMPTY, piece).flip().unwrap();
        assert_invariants(&flipped);
        assert_eq!(
            flipped.current_piece(),
            Some(ActivePiece::new(PieceKind::T, 0, 5, Rotation::new(3)))
        );
    }

    #[test]
    fn test_flip_never_moves_vertically() {
        let playfield = Playfield::from_ascii(
            "
            ZZZZ.ZZZZZ
            ZZZZ.ZZZZZ
            ",
        );
        let piece = ActivePiece::new(PieceKind::I, 2, 16, Rotation::new(1));
        let state = state_with(playfield, piece);
        // Rotation 3 stands one column left of the well; the +1 kick puts it back.
        assert_eq!(
            state.flip().unwrap().current_piece(),
            Some(ActivePiece::new(PieceKind::I, 3, 16, Rotation::new(3)))
        );

        // Only an upward kick would make room, and flip has none.
        let piece = ActivePiece::new(PieceKind::I, 0, 15, Rotation::SPAWN);
        let blocked = Playfield::from_ascii(
            "
            ZZZZZZZZZ.
            ZZZZZZZZZ.
            ZZZZZZZZZ.
            ",
        );
        assert_eq!(state_with(blocked, piece).flip(), None);
    }

    #[test]
    fn test_game_over_on_spawn() {
        let playfield = Playfield::from_ascii(&format!(
            "...ZZZZ...\n...ZZZZ...\n{}",
            "..........\n".repeat(18)
        ));
        let piece = ActivePiece::new(PieceKind::O, 0, 18, Rotation::SPAWN);
        let state = state_with(playfield, piece);

        let over = state.lock().unwrap();
        assert_invariants(&over);
        assert!(over.is_game_over());
        assert_eq!(over.current_piece(), None);
        assert_eq!(over.ghost_piece(), None);
        assert_eq!(over.score(), 0);
        assert_eq!(over.lines(), 0);
        assert_eq!(over.level(), 1);
        assert_eq!(over.playfield().cell(0, 19), Some(Some(PieceKind::O)));
        assert_eq!(over.next_pieces(), state.next_pieces());
        assert!(over.current_cells().is_empty());
        assert!(over.ghost_cells().is_empty());

        // Terminal: every transition is a no-op.
        for direction in [Direction::Left, Direction::Right, Direction::Down] {
            assert_eq!(over.move_piece(direction, true), None);
        }
        assert_eq!(over.rotate(RotationDirection::Clockwise), None);
        assert_eq!(over.flip(), None);
        assert_eq!(over.lock(), None);
        assert_eq!(over.check_and_lock(), None);
        assert_eq!(over.soft_drop(), None);
    }

    #[test]
    fn test_with_playfield_blocked_spawn_is_over() {
        let playfield = Playfield::from_ascii(&format!(
            "...ZZZZ...\n...ZZZZ...\n{}",
            "..........\n".repeat(18)
        ));
        let state = GameState::with_playfield(SEED, playfield, 42);
        assert!(state.is_game_over());
        assert_eq!(state.top_score(), 42);
        assert_invariants(&state);
    }

    #[test]
    fn test_with_playfield_drops_full_rows() {
        let playfield = Playfield::from_ascii(&format!(
            "{}...I......\n",
            "JJJJJJJJJJ\n".repeat(5)
        ));
        let state = GameState::with_playfield(SEED, playfield, 0);
        assert_eq!(state.playfield(), &Playfield::from_ascii("...I......"));
        assert_eq!(state.score(), 0);
        assert_eq!(state.lines(), 0);
        assert_invariants(&state);

        let locked = state.lock().unwrap();
        assert_eq!(locked.stats().completed_pieces(), 1);
        assert_eq!(locked.lines(), 0);
        assert_invariants(&locked);
    }

    #[test]
    fn test_blocked_side_move_is_rejected() {
        let piece = ActivePiece::new(PieceKind::O, 8, 0, Rotation::SPAWN);
        let state = state_with(Playfield::EMPTY, piece);
        assert_eq!(state.move_piece(Direction::Right, false), None);
        // lock_on_failure only applies to downward moves.
        assert_eq!(state.move_piece(Direction::Right, true), None);
    }

    #[test]
    fn test_check_and_lock() {
        let piece = ActivePiece::new(PieceKind::O, 0, 17, Rotation::SPAWN);
        let state = state_with(Playfield::EMPTY, piece);
        assert_eq!(state.check_and_lock(), None);

        let landed = state.move_piece(Direction::Down, false).unwrap();
        let locked = landed.check_and_lock().unwrap();
        assert_eq!(locked.stats().completed_pieces(), 1);
        assert_eq!(locked.playfield().cell(0, 19), Some(Some(PieceKind::O)));
    }

    #[test]
    fn test_soft_drop() {
        let piece = ActivePiece::new(PieceKind::O, 0, 0, Rotation::SPAWN);
        let dropped = state_with(Playfield::EMPTY, piece).soft_drop().unwrap();
        assert_eq!(dropped.current_piece(), Some(piece.shifted(0, 1)));

        // Landing on this step locks at once.
        let piece = ActivePiece::new(PieceKind::O, 0, 17, Rotation::SPAWN);
        let locked = state_with(Playfield::EMPTY, piece).soft_drop().unwrap();
        assert_eq!(locked.stats().completed_pieces(), 1);
        assert_eq!(locked.playfield().cell(1, 18), Some(Some(PieceKind::O)));
    }

    #[test]
    fn test_ghost_is_idempotent() {
        let playfield = Playfield::from_ascii(
            "
            ...SS.....
            ..SS......
            ",
        );
        let piece = ActivePiece::new(PieceKind::T, 2, 0, Rotation::SPAWN);
        let first = ghost(&playfield, piece);
        let second = ghost(&playfield, piece);
        assert_eq!(first, second);
        assert_eq!(ghost(&playfield, first), first);
        assert_eq!(first.y(), 16);
    }

    #[test]
    fn test_transitions_do_not_alter_input() {
        let state = GameState::with_seed(SEED);
        let snapshot = state.clone();
        let _ = state.move_piece(Direction::Left, true);
        let _ = state.rotate(RotationDirection::Clockwise);
        let _ = state.flip();
        let _ = state.lock();
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_restart_keeps_top_score() {
        let playfield = Playfield::from_ascii(".JJJJJJJJJ");
        let piece = ActivePiece::new(PieceKind::I, -2, 16, Rotation::new(1));
        let state = state_with(playfield, piece).lock().unwrap();
        assert_eq!(state.top_score(), 100);

        let restarted = state.restart();
        assert_invariants(&restarted);
        assert_eq!(restarted.score(), 0);
        assert_eq!(restarted.top_score(), 100);
        assert_eq!(restarted.playfield(), &Playfield::EMPTY);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Move(Direction, bool),
        Rotate(RotationDirection),
        Flip,
        Lock,
        CheckAndLock,
        SoftDrop,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            prop::sample::select(vec![Direction::Left, Direction::Right, Direction::Down])
                .prop_flat_map(|d| any::<bool>().prop_map(move |l| Op::Move(d, l))),
            prop::sample::select(vec![
                RotationDirection::Clockwise,
                RotationDirection::CounterClockwise
            ])
            .prop_map(Op::Rotate),
            Just(Op::Flip),
            Just(Op::Lock),
            Just(Op::CheckAndLock),
            Just(Op::SoftDrop),
        ]
    }

    proptest! {
        #[test]
        fn random_play_keeps_invariants(
            seed in any::<[u8; 16]>(),
            ops in prop::collection::vec(op_strategy(), 1..300),
        ) {
            let mut state = GameState::with_seed(PieceSeed::from_bytes(seed));
            let mut top_score = state.top_score();
            for op in ops {
                let next = match op {
                    Op::Move(direction, lock) => state.move_piece(direction, lock),
                    Op::Rotate(direction) => state.rotate(direction),
                    Op::Flip => state.flip(),
                    Op::Lock => state.lock(),
                    Op::CheckAndLock => state.check_and_lock(),
                    Op::SoftDrop => state.soft_drop(),
                };
                if let Some(next) = next {
                    state = next;
                }
                assert_invariants(&state);
                prop_assert!(state.top_score() >= top_score);
                top_score = state.top_score();
            }
        }
    }
}
