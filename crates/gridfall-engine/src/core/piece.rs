use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A single cell of the playfield or of a piece shape.
///
/// Cells carry the kind of the piece that filled them so the presentation
/// layer can recover the color; collision logic only distinguishes empty
/// from occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell filled by a piece of the given kind.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Color id for rendering: 0 for empty, 1..=7 matching [`PieceKind`].
    #[must_use]
    pub const fn color_id(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(kind) => kind.color_id(),
        }
    }
}

/// Enum representing the type of piece.
///
/// Declaration order fixes the 1-based color ids: I=1, J=2, L=3, O=4, S=5,
/// T=6, Z=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::J,
            2 => PieceKind::L,
            3 => PieceKind::O,
            4 => PieceKind::S,
            5 => PieceKind::T,
            _ => PieceKind::Z,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Rotation states per kind. Rotation indices wrap modulo this.
    pub const STATE_COUNT: usize = 4;

    /// Color id used when this kind's cells are stamped into the grid.
    #[must_use]
    pub const fn color_id(self) -> u8 {
        self as u8 + 1
    }

    /// Shape matrix for the given rotation state.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not below [`Self::STATE_COUNT`].
    #[must_use]
    pub fn shape(self, state: usize) -> &'static ShapeMatrix {
        &PIECE_SHAPES[self as usize][state]
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Piece shape within its 4x4 bounding box, one matrix per rotation state.
pub type ShapeMatrix = [[Cell; 4]; 4];

/// Iterates the occupied cells of a shape as `(dx, dy)` offsets relative to
/// the bounding box origin.
#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn occupied_offsets(shape: &ShapeMatrix) -> impl Iterator<Item = (i32, i32)> + '_ {
    shape.iter().enumerate().flat_map(|(dy, row)| {
        row.iter()
            .enumerate()
            .filter_map(move |(dx, cell)| (!cell.is_empty()).then_some((dx as i32, dy as i32)))
    })
}

/// Generates all 4 rotation states of a shape by rotating 90 degrees
/// clockwise.
///
/// `size` is the effective footprint of the piece (4 for I, 2 for O, 3 for
/// the rest); cells outside it stay empty in every state.
const fn shape_rotations(size: usize, shape: &ShapeMatrix) -> [ShapeMatrix; 4] {
    let mut rotates = [*shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut next = [[Cell::Empty; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                next[y][x] = rotates[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotates[i] = next;
        i += 1;
    }
    rotates
}

/// Read-only rotation-state catalog, indexed by kind then state.
///
/// The base orientations are spelled out; the other three states are
/// derived at compile time.
pub(crate) const PIECE_SHAPES: [[ShapeMatrix; 4]; PieceKind::LEN] = {
    use Cell::Empty as E;
    const I: Cell = Cell::Piece(PieceKind::I);
    const J: Cell = Cell::Piece(PieceKind::J);
    const L: Cell = Cell::Piece(PieceKind::L);
    const O: Cell = Cell::Piece(PieceKind::O);
    const S: Cell = Cell::Piece(PieceKind::S);
    const T: Cell = Cell::Piece(PieceKind::T);
    const Z: Cell = Cell::Piece(PieceKind::Z);
    const EEEE: [Cell; 4] = [E; 4];
    [
        // I-piece
        shape_rotations(4, &[EEEE, [I, I, I, I], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, &[[J, E, E, E], [J, J, J, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, &[[E, E, L, E], [L, L, L, E], EEEE, EEEE]),
        // O-piece
        shape_rotations(2, &[[O, O, E, E], [O, O, E, E], EEEE, EEEE]),
        // S-piece
        shape_rotations(3, &[[E, S, S, E], [S, S, E, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, &[[E, T, E, E], [T, T, T, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, &[[Z, Z, E, E], [E, Z, Z, E], EEEE, EEEE]),
    ]
};
