//! Shared numeric constants for the grid crate.

// ── Grid ────────────────────────────────────────────────────────

/// Cells per side of the toroidal grid (5000 x 5000 = 25M cells).
pub const GRID_SIZE: i64 = 5000;

/// Largest region a single ad may purchase. Enforced by callers, not by
/// [`crate::placement::compute_cells`].
pub const MAX_PIXEL_COUNT: u32 = 100;

// ── Zoom ────────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.1;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 50.0;

/// Zoom level a fresh viewing session starts at (12px cells).
pub const DEFAULT_ZOOM: f64 = 6.0;

/// Wheel scroll toward the user (zoom in).
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Wheel scroll away from the user (zoom out).
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// "+" button step.
pub const BUTTON_ZOOM_IN: f64 = 1.2;

/// "-" button step.
pub const BUTTON_ZOOM_OUT: f64 = 0.8;

// ── Gestures ────────────────────────────────────────────────────

/// A press/release pair moving less than this many pixels on both axes is a
/// click rather than a pan.
pub const CLICK_THRESHOLD_PX: f64 = 3.0;

// ── Minimap ─────────────────────────────────────────────────────

/// Side length of the square overview map, in CSS pixels.
pub const MINIMAP_SIZE_PX: f64 = 200.0;
