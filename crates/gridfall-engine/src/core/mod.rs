//! Core data structures: the cell grid, the piece catalog, and the
//! stateless matrix calculations they share.

pub use self::{grid::*, piece::*, rotator::*};

pub(crate) mod grid;
pub mod matrix;
pub(crate) mod piece;
pub(crate) mod rotator;
