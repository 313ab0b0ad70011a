//! Durable top-N score list for the rules engine.
//!
//! The store keeps a ranked list of final scores in a plain text file, one
//! integer per line, highest first. It is deliberately forgiving: a
//! missing or unreadable file and unparsable lines all degrade to "no
//! scores available" so that persistence trouble can never interrupt
//! gameplay.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// How many scores are kept when nothing else is specified.
pub const DEFAULT_CAPACITY: usize = 3;

/// File-backed ranked score list.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
    capacity: usize,
}

impl HighScoreStore {
    /// Creates a store persisting to `path`, keeping the top
    /// [`DEFAULT_CAPACITY`] scores.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, DEFAULT_CAPACITY)
    }

    /// Like [`Self::new`] with an explicit capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        assert!(capacity > 0, "score list capacity must be non-zero");
        Self {
            path: path.into(),
            capacity,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored scores, highest first, at most `capacity` entries.
    ///
    /// Read failures and garbage lines are skipped silently; the worst
    /// case is an empty list, never an error.
    #[must_use]
    pub fn top_scores(&self) -> Vec<u64> {
        let Ok(data) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        let mut scores: Vec<u64> = data
            .lines()
            .filter_map(|line| line.trim().parse().ok())
            .collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(self.capacity);
        scores
    }

    /// Merges a finished game's score into the ranking and rewrites the
    /// file.
    ///
    /// The returned error only reports that the write failed; the caller
    /// is free to ignore it, since the next [`Self::top_scores`] simply
    /// reflects whatever made it to disk.
    pub fn submit(&self, score: u64) -> io::Result<()> {
        let mut scores = self.top_scores();
        scores.push(score);
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(self.capacity);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut out = String::new();
        for score in scores {
            out.push_str(&score.to_string());
            out.push('\n');
        }
        fs::write(&self.path, out)
    }
}
