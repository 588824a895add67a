//! Placement of new ads.
//!
//! A purchase of `n` cells becomes a near-square rectangle anchored at the
//! clicked cell: `width = ceil(sqrt(n))`, `height = ceil(n / width)`, filled
//! row-major so the last row may be partial. Cells are returned unwrapped, the
//! way they are stored; every comparison against existing ads wraps both sides
//! first, so a rectangle that runs off the right edge of the grid still
//! collides with whatever sits at the left edge.
//!
//! Rejection is final: the caller must pick another anchor. No alternative
//! position is searched for.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use std::collections::HashSet;

use crate::ads::AdPlacement;
use crate::wrap::{GridCell, wrap_cell};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("cells at anchor ({}, {}) are already occupied", anchor.x, anchor.y)]
    Occupied { anchor: GridCell },
    #[error("pixel count {count} outside 1..={max}")]
    InvalidPixelCount { count: u32, max: u32 },
}

/// Width and height of the rectangle for `pixel_count` cells.
///
/// Returns `(0, 0)` for zero.
#[must_use]
pub fn rect_dims(pixel_count: u32) -> (u32, u32) {
    if pixel_count == 0 {
        return (0, 0);
    }
    let mut width = pixel_count.isqrt();
    if width * width < pixel_count {
        width += 1;
    }
    (width, pixel_count.div_ceil(width))
}

/// The cells an ad of `pixel_count` cells occupies when anchored at `anchor`,
/// in row-major order and before wrapping.
///
/// Any count is accepted; the business limit is the caller's concern.
#[must_use]
pub fn compute_cells(pixel_count: u32, anchor: GridCell) -> Vec<GridCell> {
    let (width, _) = rect_dims(pixel_count);
    (0..pixel_count)
        .map(|i| GridCell {
            x: anchor.x + i64::from(i % width),
            y: anchor.y + i64::from(i / width),
        })
        .collect()
}

/// Canonical cells occupied by any of `ads`.
#[must_use]
pub fn occupied_cells(ads: &[AdPlacement]) -> HashSet<GridCell> {
    ads.iter()
        .flat_map(|ad| ad.cells.iter().copied().map(wrap_cell))
        .collect()
}

/// Whether any candidate cell lands on a cell already held by one of `ads`.
#[must_use]
pub fn overlaps(candidate: &[GridCell], ads: &[AdPlacement]) -> bool {
    let occupied = occupied_cells(ads);
    candidate.iter().any(|c| occupied.contains(&wrap_cell(*c)))
}

/// The canonical candidate cells that collide with `ads`, in candidate order.
#[must_use]
pub fn conflicting_cells(candidate: &[GridCell], ads: &[AdPlacement]) -> Vec<GridCell> {
    let occupied = occupied_cells(ads);
    candidate
        .iter()
        .map(|c| wrap_cell(*c))
        .filter(|c| occupied.contains(c))
        .collect()
}

/// Compute the rectangle at `anchor` and reject it if it overlaps `ads`.
///
/// # Errors
///
/// Returns [`PlacementError::Occupied`] if any cell is taken.
pub fn place(pixel_count: u32, anchor: GridCell, ads: &[AdPlacement]) -> Result<Vec<GridCell>, PlacementError> {
    let cells = compute_cells(pixel_count, anchor);
    if overlaps(&cells, ads) {
        return Err(PlacementError::Occupied { anchor });
    }
    Ok(cells)
}

/// Enforce the purchasable range `1..=max`.
///
/// # Errors
///
/// Returns [`PlacementError::InvalidPixelCount`] for zero or anything above `max`.
pub fn validate_pixel_count(count: u32, max: u32) -> Result<u32, PlacementError> {
    if count == 0 || count > max {
        return Err(PlacementError::InvalidPixelCount { count, max });
    }
    Ok(count)
}
