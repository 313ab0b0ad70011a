use crate::config::GameConfig;

/// Base points awarded for clearing `lines` rows at once.
///
/// Grows quadratically, so multi-line clears pay off more than the same
/// rows cleared one at a time.
#[must_use]
pub fn line_clear_bonus(lines: usize) -> usize {
    50 * lines * lines
}

/// Score, level, and combo-streak progression.
///
/// The streak counts lines cleared across consecutive clearing locks; any
/// lock that clears nothing breaks it. Once the streak reaches the
/// configured threshold, line-clear bonuses are scaled by the configured
/// multiplier (truncated to an integer).
#[derive(Debug, Clone)]
pub struct Score {
    score: usize,
    level: usize,
    lines_cleared: usize,
    combo_streak: usize,
    start_level: usize,
    lines_per_level: usize,
    combo_threshold: usize,
    combo_multiplier: f64,
}

impl Score {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            level: config.start_level,
            lines_cleared: 0,
            combo_streak: 0,
            start_level: config.start_level,
            lines_per_level: config.lines_per_level,
            combo_threshold: config.combo_threshold,
            combo_multiplier: config.combo_multiplier,
        }
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    #[must_use]
    pub fn combo_streak(&self) -> usize {
        self.combo_streak
    }

    /// Adds flat points (soft-drop and hard-drop rewards).
    pub fn add(&mut self, points: usize) {
        self.score += points;
    }

    /// Records the outcome of a lock.
    ///
    /// A lock that cleared nothing resets the streak and awards nothing.
    /// Otherwise the streak grows by the cleared lines, the (possibly
    /// multiplied) bonus is added, and the level is re-evaluated.
    ///
    /// The level advances by at most one step per clear event: even when a
    /// single clear crosses two thresholds at once, the remaining step is
    /// only taken on the next clear.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn process_line_clear(&mut self, lines: usize, base_bonus: usize) {
        if lines == 0 {
            self.combo_streak = 0;
            return;
        }

        self.combo_streak += lines;
        let bonus = if self.combo_streak >= self.combo_threshold {
            (base_bonus as f64 * self.combo_multiplier) as usize
        } else {
            base_bonus
        };
        self.score += bonus;

        self.lines_cleared += lines;
        if self.lines_cleared / self.lines_per_level + 1 > self.level {
            self.level += 1;
        }
    }

    /// Back to the starting values for a new game.
    pub fn reset(&mut self) {
        self.score = 0;
        self.level = self.start_level;
        self.lines_cleared = 0;
        self.combo_streak = 0;
    }
}
