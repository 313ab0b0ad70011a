use super::piece::{PieceKind, ShapeMatrix};

/// Tracks the rotation state of the active piece.
///
/// The tracker only computes candidate states; legality against the grid is
/// the board's business. `peek_next` proposes the following state without
/// committing it, and `commit` applies it once the board has validated the
/// placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotator {
    kind: PieceKind,
    state: usize,
}

impl PieceRotator {
    /// Binds a fresh piece at rotation state 0.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self { kind, state: 0 }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> usize {
        self.state
    }

    /// Rebinds to a new kind, resetting the rotation state to 0.
    pub fn bind(&mut self, kind: PieceKind) {
        self.kind = kind;
        self.state = 0;
    }

    #[must_use]
    pub fn current_shape(&self) -> &'static ShapeMatrix {
        self.kind.shape(self.state)
    }

    /// The shape one rotation further, plus its state index, without
    /// changing the current state.
    #[must_use]
    pub fn peek_next(&self) -> (&'static ShapeMatrix, usize) {
        let next = (self.state + 1) % PieceKind::STATE_COUNT;
        (self.kind.shape(next), next)
    }

    /// Applies a previously peeked state.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not a valid rotation-state index.
    pub fn commit(&mut self, state: usize) {
        assert!(state < PieceKind::STATE_COUNT, "rotation state {state} out of range");
        self.state = state;
    }
}
