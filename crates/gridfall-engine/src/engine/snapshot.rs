use crate::core::ShapeMatrix;

/// Read-only projection of the active game state for the presentation
/// layer.
///
/// Produced on demand after every mutation; every field is an independent
/// copy, so holding a snapshot can never corrupt or observe live engine
/// state. The locked grid itself is read through
/// [`Board::grid`](super::Board::grid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// Shape matrix of the active piece in its current rotation state.
    pub active_shape: ShapeMatrix,
    /// Column of the active piece's bounding box.
    pub x: i32,
    /// Row of the active piece's bounding box.
    pub y: i32,
    /// Row the active piece would land on if hard-dropped now.
    pub ghost_y: i32,
    /// Spawn-state shapes of the next queued pieces, front first.
    pub next_shapes: Vec<ShapeMatrix>,
    /// Spawn-state shape of the held piece, if any.
    pub hold_shape: Option<ShapeMatrix>,
}
