use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{ActivePiece, PieceKind, Playfield, Rotation};

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator behind the [`NextQueue`]. Using the same seed produces the same
/// sequence of pieces, which makes games reproducible for debugging and tests.
///
/// Seeds format as 32 lowercase hex digits and parse from 32 hex digits of
/// either case.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameState, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let a = GameState::with_seed(seed);
/// let b = GameState::with_seed(seed);
/// assert_eq!(a.next_pieces(), b.next_pieces());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        // from_str_radix accepts a leading '+', so check the digits explicitly.
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Draws one piece kind uniformly at random, with replacement.
pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> PieceKind {
    rng.random()
}

/// Upcoming pieces, front first.
///
/// The queue always holds exactly [`NextQueue::LEN`] kinds. Taking the front
/// appends a freshly drawn kind to the tail. The generator state travels with
/// the queue, so a `GameState` value fully determines every future piece.
///
/// Like everything else in the engine, the queue is a value: [`Self::advance`]
/// returns a new queue and leaves the receiver as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextQueue {
    rng: Pcg32,
    pieces: [PieceKind; NextQueue::LEN],
}

impl NextQueue {
    pub const LEN: usize = 4;

    /// Creates a queue from a fresh random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let pieces = std::array::from_fn(|_| draw(&mut rng));
        Self { rng, pieces }
    }

    #[must_use]
    pub const fn pieces(&self) -> &[PieceKind; Self::LEN] {
        &self.pieces
    }

    #[must_use]
    pub const fn peek(&self) -> PieceKind {
        self.pieces[0]
    }

    /// Takes the front kind and returns it with the refilled queue.
    #[must_use]
    pub fn advance(&self) -> (PieceKind, Self) {
        let mut next = self.clone();
        let front = next.pieces[0];
        next.pieces.rotate_left(1);
        next.pieces[Self::LEN - 1] = draw(&mut next.rng);
        (front, next)
    }
}

impl Default for NextQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the bounding-box origin at which a freshly spawned `kind` appears.
///
/// Every kind shares the same column. The I-piece starts one row higher
/// because its first matrix row is empty.
#[must_use]
pub const fn spawn_position(kind: PieceKind) -> (i32, i32) {
    let x = (Playfield::WIDTH_I32 - 2) / 2;
    let y = match kind {
        PieceKind::I => -1,
        _ => 0,
    };
    (x, y)
}

/// Outcome of taking the next piece from the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spawn {
    pub piece: ActivePiece,
    pub queue: NextQueue,
    /// The piece collides with locked cells at its spawn position.
    pub game_over: bool,
}

/// Takes the front of `queue` and places it at its spawn position on `playfield`.
#[must_use]
pub fn spawn(queue: &NextQueue, playfield: &Playfield) -> Spawn {
    let (kind, queue) = queue.advance();
    let (x, y) = spawn_position(kind);
    let piece = ActivePiece::new(kind, x, y, Rotation::SPAWN);
    Spawn {
        piece,
        queue,
        game_over: !playfield.fits_piece(piece),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;

    const SEED: PieceSeed = PieceSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_known_value_all_zeros() {
            let seed = PieceSeed([0u8; 16]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"00000000000000000000000000000000\"");

            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            // Big-endian: first byte appears first in the hex string
            let seed = PieceSeed([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
            assert_eq!(
                serde_json::to_string(&seed).unwrap(),
                "\"0123456789abcdeffedcba9876543210\""
            );
        }

        #[test]
        fn test_parse_uppercase_hex() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_random_seed_format() {
            let seed: PieceSeed = rand::rng().random();
            let hex_str = seed.to_string();
            assert_eq!(hex_str.len(), 32);
            assert!(hex_str.chars().all(|c| c.is_ascii_hexdigit()));
            assert_eq!(hex_str.parse::<PieceSeed>(), Ok(seed));
        }

        #[test]
        fn test_error_cases() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
                "+123456789abcdef0123456789abcdef",
            ] {
                let err = input.parse::<PieceSeed>().unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{input:?}");
                assert!(serde_json::from_str::<PieceSeed>(&format!("\"{input}\"")).is_err());
            }
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = NextQueue::with_seed(SEED);
        let mut b = NextQueue::with_seed(SEED);
        assert_eq!(a.pieces(), b.pieces());
        for _ in 0..50 {
            let (ka, qa) = a.advance();
            let (kb, qb) = b.advance();
            assert_eq!(ka, kb);
            a = qa;
            b = qb;
        }
    }

    #[test]
    fn test_advance_shifts_and_refills() {
        let queue = NextQueue::with_seed(SEED);
        let before = *queue.pieces();
        let (front, next) = queue.advance();
        assert_eq!(front, before[0]);
        assert_eq!(next.pieces()[..3], before[1..]);
        assert_eq!(next.pieces().len(), NextQueue::LEN);
        // The receiver is untouched.
        assert_eq!(*queue.pieces(), before);
    }

    #[test]
    fn test_spawn_position() {
        assert_eq!(spawn_position(PieceKind::I), (4, -1));
        for kind in PieceKind::ALL.into_iter().filter(|k| *k != PieceKind::I) {
            assert_eq!(spawn_position(kind), (4, 0), "{kind}");
        }
    }

    #[test]
    fn test_spawn_on_empty_playfield() {
        let queue = NextQueue::with_seed(SEED);
        let spawned = spawn(&queue, &Playfield::EMPTY);
        assert!(!spawned.game_over);
        assert_eq!(spawned.piece.kind(), queue.peek());
        assert_eq!(spawned.piece.rotation(), Rotation::SPAWN);
        assert_eq!(
            (spawned.piece.x(), spawned.piece.y()),
            spawn_position(queue.peek())
        );
        assert_eq!(spawned.queue.pieces()[..3], queue.pieces()[1..]);
    }

    #[test]
    fn test_spawn_into_occupied_cells_is_game_over() {
        // Rows 0 and 1 are blocked in the spawn columns.
        let mut art = String::from("...ZZZZ...\n...ZZZZ...\n");
        for _ in 2..Playfield::HEIGHT {
            art.push_str("..........\n");
        }
        let playfield = Playfield::from_ascii(&art);
        let spawned = spawn(&NextQueue::with_seed(SEED), &playfield);
        assert!(spawned.game_over);
    }

    #[test]
    fn test_draw_is_uniform_with_replacement() {
        let mut rng = Pcg32::from_seed(SEED.0);
        let draws: Vec<_> = (0..200).map(|_| draw(&mut rng)).collect();
        // Without a bag, some kind repeats back to back within 200 draws.
        assert!(draws.windows(2).any(|w| w[0] == w[1]));
        for kind in PieceKind::ALL {
            assert!(draws.contains(&kind), "{kind} never drawn");
        }
    }
}
