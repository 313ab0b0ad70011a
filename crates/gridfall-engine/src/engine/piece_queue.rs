use std::{collections::VecDeque, fmt::Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::PieceKind;

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the queue's random number generator. The same seed
/// produces the same piece sequence, which makes scripted scenarios and
/// tests reproducible. Serializes as a 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex = String::with_capacity(2 * self.0.len());
        write!(&mut hex, "{num:032x}").unwrap();
        serializer.serialize_str(&hex)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        if hex.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid seed: expected 32 hex characters, got {}",
                hex.len()
            )));
        }
        let num = u128::from_str_radix(&hex, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid seed: {hex} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Buffered supply of upcoming pieces.
///
/// Kinds are drawn with uniform probability and held in a deque so the
/// next `preview_count` pieces can always be inspected without being
/// consumed. The buffer is topped up whenever it drops to the preview
/// watermark, so `next_pieces` never runs dry mid-game.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: Pcg32,
    upcoming: VecDeque<PieceKind>,
    preview_count: usize,
}

impl PieceQueue {
    /// Creates a queue with a random seed.
    #[must_use]
    pub fn new(preview_count: usize) -> Self {
        Self::with_seed(rand::rng().random(), preview_count)
    }

    /// Like [`Self::new`], but with a fixed seed for a deterministic piece
    /// sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed, preview_count: usize) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            upcoming: VecDeque::with_capacity(preview_count + 1),
            preview_count,
        };
        this.top_up();
        this
    }

    /// Refills the buffer so that one pop still leaves a full preview.
    fn top_up(&mut self) {
        while self.upcoming.len() <= self.preview_count {
            let kind = self.rng.random();
            self.upcoming.push_back(kind);
        }
    }

    /// Draws and consumes the next piece.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty (cannot happen with the refill
    /// policy).
    pub fn pop_next(&mut self) -> PieceKind {
        self.top_up();
        self.upcoming
            .pop_front()
            .expect("piece buffer should never be empty")
    }

    /// Iterates the buffered upcoming pieces without consuming them.
    ///
    /// At least `preview_count` entries are always available.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.upcoming.iter().copied()
    }

    #[must_use]
    pub fn preview_count(&self) -> usize {
        self.preview_count
    }
}
