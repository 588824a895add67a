#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
use crate::wrap::{GridCell, wrap_cell};

/// A point in either screen space (CSS pixels) or world space (cells).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Pixels per grid cell at `zoom`: `max(1, floor(zoom * 2))`.
///
/// The integer step means zoom changes below half a unit may leave the cell
/// size unchanged.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn cell_size_px(zoom: f64) -> i64 {
    ((zoom * 2.0).floor() as i64).max(1)
}

/// Clamp a requested zoom into `[MIN_ZOOM, MAX_ZOOM]`. NaN becomes `MIN_ZOOM`.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return MIN_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Pan/zoom window onto the world.
///
/// `pan_x` / `pan_y` are the world-space origin offset in screen pixels: the
/// screen's top-left corner sits at world `pan / cell_size`. Pan is unbounded;
/// cells are canonicalized only when they are derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: DEFAULT_ZOOM }
    }
}

impl Viewport {
    /// Current cell size in pixels.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let size = cell_size_px(self.zoom) as f64;
        size
    }

    /// Convert a screen-space point to (unwrapped, fractional) world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let size = self.cell_size();
        Point { x: (self.pan_x + screen.x) / size, y: (self.pan_y + screen.y) / size }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        let size = self.cell_size();
        Point { x: world.x * size - self.pan_x, y: world.y * size - self.pan_y }
    }

    /// The canonical cell under a screen-space point.
    #[must_use]
    pub fn screen_to_cell(&self, screen: Point) -> GridCell {
        world_to_cell(self.screen_to_world(screen))
    }

    /// World coordinates at the center of a `width` x `height` screen.
    #[must_use]
    pub fn center_world(&self, width: f64, height: f64) -> Point {
        self.screen_to_world(Point::new(width / 2.0, height / 2.0))
    }

    /// Pan so that `world` sits at the center of a `width` x `height` screen.
    pub fn center_on(&mut self, world: Point, width: f64, height: f64) {
        let size = self.cell_size();
        self.pan_x = world.x * size - width / 2.0;
        self.pan_y = world.y * size - height / 2.0;
    }
}

/// Floor a world point to its cell and canonicalize it.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn world_to_cell(world: Point) -> GridCell {
    wrap_cell(GridCell { x: world.x.floor() as i64, y: world.y.floor() as i64 })
}
