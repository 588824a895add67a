//! Pan/zoom controller.
//!
//! The geometry lives in two pure functions, [`dragged`] and [`zoomed_at`],
//! that map an old [`Viewport`] to a new one. [`ViewportController`] is the
//! thin stateful shell around them: it owns the current viewport and the drag
//! gesture and is handed to event handlers by `&mut`.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::camera::{Point, Viewport, clamp_zoom};
use crate::input::{DragAnchor, Gesture, InputState};

/// Viewport after dragging from `anchor` to `pointer`.
///
/// The world follows the pointer: moving right by `d` pixels decreases pan by
/// `d`. Pan is never clamped.
#[must_use]
pub fn dragged(viewport: Viewport, anchor: DragAnchor, pointer: Point) -> Viewport {
    Viewport {
        pan_x: anchor.pan_x - (pointer.x - anchor.pointer.x),
        pan_y: anchor.pan_y - (pointer.y - anchor.pointer.y),
        ..viewport
    }
}

/// Viewport after scaling zoom by `factor` around the screen point `pointer`.
///
/// The world point under the pointer stays under the pointer. Zoom is clamped
/// into range rather than rejected; a non-finite `factor` is ignored.
#[must_use]
pub fn zoomed_at(viewport: Viewport, pointer: Point, factor: f64) -> Viewport {
    if !factor.is_finite() {
        return viewport;
    }
    let world = viewport.screen_to_world(pointer);
    let mut next = Viewport { zoom: clamp_zoom(viewport.zoom * factor), ..viewport };
    let size = next.cell_size();
    next.pan_x = world.x * size - pointer.x;
    next.pan_y = world.y * size - pointer.y;
    next
}

/// Viewport after scaling zoom by `factor` with pan left untouched.
///
/// Used by the zoom buttons, which have no pointer to anchor on.
#[must_use]
pub fn zoomed(viewport: Viewport, factor: f64) -> Viewport {
    if !factor.is_finite() {
        return viewport;
    }
    Viewport { zoom: clamp_zoom(viewport.zoom * factor), ..viewport }
}

/// Owns the viewport and the in-flight drag gesture.
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    viewport: Viewport,
    input: InputState,
}

impl ViewportController {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport, input: InputState::Idle }
    }

    /// The current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the viewport (e.g. after navigation).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.input, InputState::Dragging { .. })
    }

    /// Begin a drag at `pointer`, anchoring on the current pan.
    pub fn start_drag(&mut self, pointer: Point) {
        self.input = InputState::Dragging {
            anchor: DragAnchor { pan_x: self.viewport.pan_x, pan_y: self.viewport.pan_y, pointer },
        };
    }

    /// Pan to follow the pointer. Returns `false` when no drag is in progress.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let InputState::Dragging { anchor } = self.input else {
            return false;
        };
        self.viewport = dragged(self.viewport, anchor, pointer);
        true
    }

    /// Finish the drag at `pointer`. Returns `true` if the gesture was a click.
    ///
    /// Releasing without a prior press is never a click.
    pub fn end_drag(&mut self, pointer: Point) -> bool {
        let InputState::Dragging { anchor } = std::mem::take(&mut self.input) else {
            return false;
        };
        Gesture::classify(anchor.pointer, pointer) == Gesture::Click
    }

    /// Drop the current gesture without classifying it.
    pub fn cancel_drag(&mut self) {
        self.input = InputState::Idle;
    }

    /// Zoom by `factor` keeping the world point under `pointer` fixed.
    pub fn zoom_at(&mut self, pointer: Point, factor: f64) {
        self.viewport = zoomed_at(self.viewport, pointer, factor);
    }

    /// Zoom by `factor` without moving the pan.
    pub fn zoom_by(&mut self, factor: f64) {
        self.viewport = zoomed(self.viewport, factor);
    }
}
