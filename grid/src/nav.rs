//! Nearest-ad navigation for the left/right buttons.
//!
//! Candidates are every ad's bounding-box center at each of the nine wrap
//! offsets. The nearest candidate strictly in the requested direction wins;
//! when there is none, the nearest candidate overall is used instead so the
//! button always goes somewhere while any ad exists.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use crate::ads::{AdId, AdPlacement};
use crate::camera::Point;
use crate::wrap::WRAP_OFFSETS;

/// Which navigation button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Whether `candidate` lies strictly on this side of `current`.
    #[must_use]
    pub fn admits(self, current: Point, candidate: Point) -> bool {
        match self {
            Self::Left => candidate.x < current.x,
            Self::Right => candidate.x > current.x,
        }
    }
}

/// Where navigation should move the viewport center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavTarget {
    /// The ad being navigated to.
    pub ad_id: AdId,
    /// The chosen wrap copy of the ad's center, in world coordinates. May lie
    /// outside the canonical range so the viewport moves the short way.
    pub center: Point,
    /// Distance from the starting center.
    pub distance: f64,
    /// `false` when no ad lay in the requested direction and this is the
    /// overall nearest instead.
    pub in_direction: bool,
}

/// Find the ad center to navigate to from `current` toward `direction`.
///
/// Returns `None` only when no ad has any cells.
#[must_use]
pub fn find_nearest(current: Point, ads: &[AdPlacement], direction: Direction) -> Option<NavTarget> {
    let mut directional: Option<NavTarget> = None;
    let mut overall: Option<NavTarget> = None;

    for (ad_id, center) in candidates(ads) {
        let distance = current.distance(center);
        let in_direction = direction.admits(current, center);
        let target = NavTarget { ad_id, center, distance, in_direction };

        if in_direction && directional.is_none_or(|best| distance < best.distance) {
            directional = Some(target);
        }
        if overall.is_none_or(|best| distance < best.distance) {
            overall = Some(target);
        }
    }

    directional.or(overall.map(|t| NavTarget { in_direction: false, ..t }))
}

/// Every wrap copy of every ad center, ads in order, offsets in
/// [`WRAP_OFFSETS`] order.
fn candidates(ads: &[AdPlacement]) -> impl Iterator<Item = (AdId, Point)> + '_ {
    ads.iter().filter_map(|ad| ad.center().map(|c| (ad.id, c))).flat_map(|(id, c)| {
        WRAP_OFFSETS.iter().map(move |&(dx, dy)| {
            #[allow(clippy::cast_precision_loss)]
            let shifted = Point::new(c.x + dx as f64, c.y + dy as f64);
            (id, shifted)
        })
    })
}
