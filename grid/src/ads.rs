//! Ad model: placements, their bounding boxes, and the in-memory ad store.
//!
//! An [`AdPlacement`] is the geometric view of a purchased ad: its id, the
//! cells it occupies exactly as they were stored at submission (possibly past
//! `GRID_SIZE` when the anchor sat near the seam), and an optional
//! call-to-action URL. Media metadata is carried along opaquely for the host.
//!
//! The host periodically polls the server and replaces the whole collection
//! via [`AdStore::load_snapshot`]. Order is preserved because hit-testing
//! resolves ties by iteration order.

#[cfg(test)]
#[path = "ads_test.rs"]
mod ads_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::wrap::GridCell;

/// Unique identifier for an ad.
pub type AdId = Uuid;

/// Axis-aligned bounding box of a cell set, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl CellBounds {
    /// Bounding box of `cells`, or `None` for an empty set.
    #[must_use]
    pub fn of(cells: &[GridCell]) -> Option<Self> {
        let first = cells.first()?;
        let init = Self { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        Some(cells.iter().fold(init, |b, c| Self {
            min_x: b.min_x.min(c.x),
            min_y: b.min_y.min(c.y),
            max_x: b.max_x.max(c.x),
            max_y: b.max_y.max(c.y),
        }))
    }

    /// Width in cells.
    #[must_use]
    pub fn width(&self) -> i64 {
        self.max_x - self.min_x + 1
    }

    /// Height in cells.
    #[must_use]
    pub fn height(&self) -> i64 {
        self.max_y - self.min_y + 1
    }

    /// Midpoint of the min/max cell coordinates.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn center(&self) -> Point {
        Point {
            x: (self.min_x + self.max_x) as f64 / 2.0,
            y: (self.min_y + self.max_y) as f64 / 2.0,
        }
    }

    /// Whether `cell` lies inside, edges included.
    #[must_use]
    pub fn contains(&self, cell: GridCell) -> bool {
        (self.min_x..=self.max_x).contains(&cell.x) && (self.min_y..=self.max_y).contains(&cell.y)
    }

    /// The same box shifted by `(dx, dy)` cells.
    #[must_use]
    pub fn translate(&self, dx: i64, dy: i64) -> Self {
        Self {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }
}

/// Kind of creative attached to an ad. Not interpreted by the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    /// Parse the lowercase wire name. Anything else is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// An ad as seen by the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdPlacement {
    pub id: AdId,
    /// Occupied cells, unwrapped, in submission order.
    #[serde(rename = "positions")]
    pub cells: Vec<GridCell>,
    /// Link opened when the ad is clicked.
    #[serde(default)]
    pub cta_url: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
}

impl AdPlacement {
    /// Build a placement with no CTA or media.
    #[must_use]
    pub fn new(id: AdId, cells: Vec<GridCell>) -> Self {
        Self { id, cells, cta_url: None, media_url: None, media_type: MediaType::Image }
    }

    /// Attach a call-to-action URL.
    #[must_use]
    pub fn with_cta(mut self, url: impl Into<String>) -> Self {
        self.cta_url = Some(url.into());
        self
    }

    /// Bounding box of the stored (unwrapped) cells.
    #[must_use]
    pub fn bounds(&self) -> Option<CellBounds> {
        CellBounds::of(&self.cells)
    }

    /// Center of the bounding box in world coordinates.
    #[must_use]
    pub fn center(&self) -> Option<Point> {
        self.bounds().map(|b| b.center())
    }
}

/// Polled snapshot of the ads currently on the grid, in server order.
#[derive(Debug, Clone, Default)]
pub struct AdStore {
    ads: Vec<AdPlacement>,
}

impl AdStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { ads: Vec::new() }
    }

    /// Replace all ads with a fresh snapshot.
    pub fn load_snapshot(&mut self, ads: Vec<AdPlacement>) {
        self.ads = ads;
    }

    /// Append one ad, replacing any existing ad with the same id in place.
    pub fn upsert(&mut self, ad: AdPlacement) {
        if let Some(slot) = self.ads.iter_mut().find(|a| a.id == ad.id) {
            *slot = ad;
        } else {
            self.ads.push(ad);
        }
    }

    /// Remove an ad by id, returning it if present.
    pub fn remove(&mut self, id: &AdId) -> Option<AdPlacement> {
        let idx = self.ads.iter().position(|a| a.id == *id)?;
        Some(self.ads.remove(idx))
    }

    /// Look up an ad by id.
    #[must_use]
    pub fn get(&self, id: &AdId) -> Option<&AdPlacement> {
        self.ads.iter().find(|a| a.id == *id)
    }

    /// All ads in snapshot order.
    #[must_use]
    pub fn as_slice(&self) -> &[AdPlacement] {
        &self.ads
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }
}
