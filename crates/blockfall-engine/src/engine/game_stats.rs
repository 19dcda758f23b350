/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
///
/// The value is multiplied by the level in effect before the lock.
pub const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: usize = 10;

/// Score, lines, level, and top score of a game, plus lock counters.
///
/// # Scoring
///
/// - No combo bonuses
/// - No back-to-back bonuses
/// - No T-spin scoring
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4); // four lines at level 1
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.lines(), 4);
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    lines: usize,
    top_score: usize,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_top_score(0)
    }

    /// Like [`Self::new`], but carrying a top score from an earlier game.
    #[must_use]
    pub const fn with_top_score(top_score: usize) -> Self {
        Self {
            score: 0,
            lines: 0,
            top_score,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the total number of lines cleared.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// Returns the current level: one more than the number of completed groups of ten lines.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.lines / LINES_PER_LEVEL + 1
    }

    /// Returns the best score seen so far, including this game.
    #[must_use]
    pub const fn top_score(&self) -> usize {
        self.top_score
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of locks by number of lines cleared.
    ///
    /// Array indices represent:
    /// - `[0]`: Number of locks with 0 lines cleared
    /// - `[1]`: Number of singles (1 line)
    /// - `[2]`: Number of doubles (2 lines)
    /// - `[3]`: Number of triples (3 lines)
    /// - `[4]`: Number of four-line clears
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece lock.
    ///
    /// Points are awarded at the level in effect before `cleared_lines` are
    /// added, so the lock that crosses a level boundary still scores at the
    /// old level.
    ///
    /// # Arguments
    ///
    /// * `cleared_lines` - Number of lines cleared (0-4)
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        let points = SCORE_TABLE[cleared_lines] * self.level();
        self.completed_pieces += 1;
        self.lines += cleared_lines;
        self.line_cleared_counter[cleared_lines] += 1;
        self.score += points;
        if self.score > self.top_score {
            self.top_score = self.score;
        }
    }
}
