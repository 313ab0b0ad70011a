//! Stateless grid/shape calculations: collision tests, stamping a shape
//! into a grid, and full-row compaction.
//!
//! Nothing here holds state; every function takes the grid and shape data
//! it operates on and returns fresh values, so the callers keep full
//! control over what is committed.

use super::{
    grid::Grid,
    piece::{ShapeMatrix, occupied_offsets},
};

/// Checks whether the shape placed at `(x, y)` collides.
///
/// A collision is any occupied shape cell that maps outside the grid (on
/// any side) or onto an already occupied grid cell. Returns `false` only
/// when every occupied cell lands on an in-bounds, empty cell.
#[must_use]
pub fn intersects(grid: &Grid, shape: &ShapeMatrix, x: i32, y: i32) -> bool {
    occupied_offsets(shape).any(|(dx, dy)| {
        let tx = x + dx;
        let ty = y + dy;
        !grid.is_inside(tx, ty) || !grid.cell_at(tx, ty).is_empty()
    })
}

/// Returns a copy of `grid` with the shape stamped at `(x, y)`.
///
/// The input grid is left untouched. Cells outside the shape's footprint
/// keep their previous value.
///
/// # Panics
///
/// Panics if an occupied shape cell falls outside the grid; the caller is
/// expected to have validated the position with [`intersects`].
#[must_use]
#[expect(clippy::cast_sign_loss)]
pub fn merge(grid: &Grid, shape: &ShapeMatrix, x: i32, y: i32) -> Grid {
    let mut merged = grid.clone();
    for (dx, dy) in occupied_offsets(shape) {
        let tx = x + dx;
        let ty = y + dy;
        assert!(
            merged.is_inside(tx, ty),
            "merging an out-of-bounds cell at ({tx}, {ty})"
        );
        merged.set_cell(tx as usize, ty as usize, shape[dy as usize][dx as usize]);
    }
    merged
}

/// Removes every full row and compacts the survivors toward the bottom.
///
/// Surviving rows keep their relative order; the vacated rows at the top
/// are left empty. Returns the number of removed rows together with the
/// compacted grid; the input is untouched.
#[must_use]
pub fn clear_full_rows(grid: &Grid) -> (usize, Grid) {
    let rows = grid.rows();
    let mut compacted = Grid::empty(rows, grid.cols());

    let mut write = rows;
    for y in (0..rows).rev() {
        let row = grid.row(y);
        if row.iter().all(|cell| !cell.is_empty()) {
            continue;
        }
        write -= 1;
        compacted.row_mut(write).copy_from_slice(row);
    }

    // Everything above `write` stayed empty, one row per cleared line.
    (write, compacted)
}
