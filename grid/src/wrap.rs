//! Toroidal wrap-around for grid coordinates.
//!
//! The grid tiles the plane: cell `(GRID_SIZE, 0)` is the same cell as
//! `(0, 0)`. Raw world coordinates are unbounded (the viewport can pan forever)
//! and ads near the seam store cells past `GRID_SIZE`, so anything that names
//! a grid cell first folds its coordinates through [`wrap`].
//!
//! Because the grid is drawn tiled, a canonical object may appear on screen at
//! any of nine translated positions. [`WRAP_OFFSETS`] enumerates them; callers
//! that test visibility, proximity or containment walk all nine and keep the
//! best. This is a fixed-size brute-force search and stays that way.

#[cfg(test)]
#[path = "wrap_test.rs"]
mod wrap_test;

use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;

/// A grid cell. Canonical when both axes are in `[0, GRID_SIZE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i64,
    pub y: i64,
}

impl GridCell {
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Whether both axes already lie in `[0, GRID_SIZE)`.
    #[must_use]
    pub fn is_canonical(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }
}

/// The nine translations of a canonical object under toroidal tiling, as
/// `(dx, dy)` pairs in cells.
pub const WRAP_OFFSETS: [(i64, i64); 9] = [
    (-GRID_SIZE, -GRID_SIZE),
    (0, -GRID_SIZE),
    (GRID_SIZE, -GRID_SIZE),
    (-GRID_SIZE, 0),
    (0, 0),
    (GRID_SIZE, 0),
    (-GRID_SIZE, GRID_SIZE),
    (0, GRID_SIZE),
    (GRID_SIZE, GRID_SIZE),
];

/// Fold any integer coordinate into `[0, GRID_SIZE)`.
///
/// Floor-modulo: negative inputs land on the far side of the grid rather than
/// producing a negative remainder.
#[must_use]
pub fn wrap(coord: i64) -> i64 {
    coord.rem_euclid(GRID_SIZE)
}

/// Fold a fractional world coordinate into `[0, GRID_SIZE)`.
#[must_use]
pub fn wrap_f64(coord: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let size = GRID_SIZE as f64;
    let wrapped = coord.rem_euclid(size);
    // rem_euclid can round up to exactly `size` for tiny negative inputs.
    if wrapped >= size { 0.0 } else { wrapped }
}

/// Canonicalize both axes of a cell independently.
#[must_use]
pub fn wrap_cell(cell: GridCell) -> GridCell {
    GridCell { x: wrap(cell.x), y: wrap(cell.y) }
}
