//! Input model: pointer buttons, wheel deltas, and the drag gesture state.
//!
//! The host translates DOM (or any other windowing) events into these types
//! before handing them to [`crate::engine::EngineCore`]. `InputState` is the
//! gesture being tracked between pointer-down and pointer-up; it carries what
//! is needed to compute the pan on every move and to tell a click from a pan
//! on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::{CLICK_THRESHOLD_PX, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

impl WheelDelta {
    /// Zoom factor for this scroll: down zooms out, anything else zooms in.
    #[must_use]
    pub fn zoom_factor(self) -> f64 {
        if self.dy > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN }
    }
}

/// Where a drag started: the pan at press time and the pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub pan_x: f64,
    pub pan_y: f64,
    pub pointer: Point,
}

/// How a finished press/release pair is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// The pointer barely moved; treat as a click at the release point.
    Click,
    /// The pointer moved far enough to count as panning.
    Pan,
}

impl Gesture {
    /// Classify a press at `start` released at `end`.
    ///
    /// A click requires less than [`CLICK_THRESHOLD_PX`] of movement on both axes.
    #[must_use]
    pub fn classify(start: Point, end: Point) -> Self {
        let moved_x = (end.x - start.x).abs();
        let moved_y = (end.y - start.y).abs();
        if moved_x < CLICK_THRESHOLD_PX && moved_y < CLICK_THRESHOLD_PX {
            Self::Click
        } else {
            Self::Pan
        }
    }
}

/// Internal state for the drag state machine.
#[derive(Debug, Clone, Copy, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pointer is down; every move pans relative to `anchor`.
    Dragging {
        /// Pan and pointer position captured on pointer-down.
        anchor: DragAnchor,
    },
}
