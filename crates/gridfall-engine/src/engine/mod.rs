//! Game logic and state management built on the core data structures:
//!
//! - [`Board`] - grid, active piece, hold slot, and the move/rotate/drop
//!   rules
//! - [`PieceQueue`] - buffered random piece supply with preview
//! - [`Score`] - score, level, and combo-streak progression
//! - [`GameSession`] - multi-turn session tying board and score to the
//!   semantic input events
//! - [`ViewSnapshot`] - copied projection handed to the presentation layer

pub use self::{board::*, piece_queue::*, score::*, session::*, snapshot::*};

mod board;
mod piece_queue;
mod score;
mod session;
mod snapshot;
