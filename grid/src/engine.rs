use crate::ads::{AdPlacement, AdStore};
use crate::camera::{Point, Viewport};
use crate::consts::{BUTTON_ZOOM_IN, BUTTON_ZOOM_OUT, GRID_SIZE, MAX_PIXEL_COUNT, MINIMAP_SIZE_PX};
use crate::hit::hit_test_clickable;
use crate::input::{Button, WheelDelta};
use crate::nav::{Direction, NavTarget, find_nearest};
use crate::placement::{PlacementError, place, validate_pixel_count};
use crate::viewport::ViewportController;
use crate::wrap::{GridCell, WRAP_OFFSETS, wrap_f64};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Viewport or selection changed; repaint.
    RenderNeeded,
    /// A click in view mode landed on a cell with no clickable ad.
    CellSelected(GridCell),
    /// A click landed on an ad with a call-to-action; open it in a new tab.
    OpenUrl(String),
    /// A click in select mode found room for the pending purchase.
    PlacementProposed { anchor: GridCell, cells: Vec<GridCell> },
    /// A click in select mode could not place the pending purchase.
    PlacementRejected { anchor: GridCell, reason: PlacementError },
    /// The viewport was centered on a navigation target.
    Navigated(NavTarget),
    /// A navigation button was pressed with no ads on the grid.
    NothingToNavigate,
}

/// What a click means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Browsing: clicks open ads or select a cell.
    #[default]
    View,
    /// Choosing where to place a purchase of `pixel_count` cells.
    Select { pixel_count: u32 },
}

/// Core engine state: all grid logic a host UI needs, with no drawing.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub ads: AdStore,
    pub controller: ViewportController,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub selected: Option<GridCell>,
    pub mode: Mode,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the ads with a freshly polled snapshot.
    pub fn load_ads(&mut self, ads: Vec<AdPlacement>) {
        self.ads.load_snapshot(ads);
    }

    /// Update the screen size in CSS pixels.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Switch click behavior. Clears any selected cell.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.selected = None;
    }

    // --- Queries ---

    /// The current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.controller.viewport()
    }

    /// The cell most recently selected or proposed as an anchor.
    #[must_use]
    pub fn selection(&self) -> Option<GridCell> {
        self.selected
    }

    /// World coordinates at the center of the screen.
    #[must_use]
    pub fn center_world(&self) -> Point {
        self.viewport().center_world(self.viewport_width, self.viewport_height)
    }

    /// Position of the "you are here" dot on the minimap, in minimap pixels.
    #[must_use]
    pub fn minimap_dot(&self) -> Point {
        let center = self.center_world();
        Point::new(to_minimap(center.x), to_minimap(center.y))
    }

    /// Ads with at least one wrap copy of their bounding box on screen.
    #[must_use]
    pub fn visible_ads(&self) -> Vec<&AdPlacement> {
        let viewport = self.viewport();
        let top_left = viewport.screen_to_world(Point::new(0.0, 0.0));
        let bottom_right = viewport.screen_to_world(Point::new(self.viewport_width, self.viewport_height));

        self.ads
            .as_slice()
            .iter()
            .filter(|ad| {
                ad.bounds().is_some_and(|bounds| {
                    WRAP_OFFSETS.iter().any(|&(dx, dy)| {
                        let b = bounds.translate(dx, dy);
                        #[allow(clippy::cast_precision_loss)]
                        let (min_x, min_y, max_x, max_y) =
                            (b.min_x as f64, b.min_y as f64, (b.max_x + 1) as f64, (b.max_y + 1) as f64);
                        min_x < bottom_right.x && max_x > top_left.x && min_y < bottom_right.y && max_y > top_left.y
                    })
                })
            })
            .collect()
    }

    // --- Input events ---

    /// Primary press starts a drag. Other buttons are ignored.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button == Button::Primary {
            self.controller.start_drag(screen_pt);
        }
        Vec::new()
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        if self.controller.drag_to(screen_pt) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Primary release ends the drag; a short one is treated as a click.
    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        if self.controller.end_drag(screen_pt) {
            self.click(screen_pt)
        } else {
            Vec::new()
        }
    }

    /// Zoom around the pointer.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        self.controller.zoom_at(screen_pt, delta.zoom_factor());
        vec![Action::RenderNeeded]
    }

    // --- Buttons ---

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.controller.zoom_by(BUTTON_ZOOM_IN);
        vec![Action::RenderNeeded]
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.controller.zoom_by(BUTTON_ZOOM_OUT);
        vec![Action::RenderNeeded]
    }

    /// Center the screen on the nearest ad toward `direction`.
    pub fn navigate(&mut self, direction: Direction) -> Vec<Action> {
        let Some(target) = find_nearest(self.center_world(), self.ads.as_slice(), direction) else {
            return vec![Action::NothingToNavigate];
        };
        self.center_on(target.center);
        vec![Action::Navigated(target), Action::RenderNeeded]
    }

    /// Center the screen on the grid location under a minimap click.
    pub fn jump_to_minimap(&mut self, minimap_pt: Point) -> Vec<Action> {
        self.center_on(Point::new(from_minimap(minimap_pt.x), from_minimap(minimap_pt.y)));
        vec![Action::RenderNeeded]
    }

    // --- Internals ---

    fn center_on(&mut self, world: Point) {
        let mut viewport = self.viewport();
        viewport.center_on(world, self.viewport_width, self.viewport_height);
        self.controller.set_viewport(viewport);
    }

    fn click(&mut self, screen_pt: Point) -> Vec<Action> {
        let cell = self.viewport().screen_to_cell(screen_pt);
        match self.mode {
            Mode::View => {
                let cta = hit_test_clickable(cell, self.ads.as_slice()).and_then(|ad| ad.cta_url.clone());
                if let Some(url) = cta {
                    return vec![Action::OpenUrl(url)];
                }
                self.selected = Some(cell);
                vec![Action::CellSelected(cell), Action::RenderNeeded]
            }
            Mode::Select { pixel_count } => {
                let placed = validate_pixel_count(pixel_count, MAX_PIXEL_COUNT)
                    .and_then(|count| place(count, cell, self.ads.as_slice()));
                match placed {
                    Ok(cells) => {
                        self.selected = Some(cell);
                        vec![Action::PlacementProposed { anchor: cell, cells }, Action::RenderNeeded]
                    }
                    Err(reason) => vec![Action::PlacementRejected { anchor: cell, reason }],
                }
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_minimap(world: f64) -> f64 {
    wrap_f64(world) / GRID_SIZE as f64 * MINIMAP_SIZE_PX
}

#[allow(clippy::cast_precision_loss)]
fn from_minimap(minimap: f64) -> f64 {
    wrap_f64(minimap / MINIMAP_SIZE_PX * GRID_SIZE as f64)
}
