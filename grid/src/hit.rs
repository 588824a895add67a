#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::ads::AdPlacement;
use crate::wrap::{GridCell, WRAP_OFFSETS};

/// Find the ad whose bounding box contains `click`.
///
/// `click` must already be canonical (see [`crate::camera::world_to_cell`]).
/// The first ad in iteration order wins; the no-overlap rule keeps that from
/// mattering in practice.
#[must_use]
pub fn hit_test(click: GridCell, ads: &[AdPlacement]) -> Option<&AdPlacement> {
    ads.iter().find(|ad| covers(ad, click))
}

/// Like [`hit_test`], but only ads that carry a call-to-action URL are
/// clickable.
#[must_use]
pub fn hit_test_clickable(click: GridCell, ads: &[AdPlacement]) -> Option<&AdPlacement> {
    ads.iter().find(|ad| ad.cta_url.is_some() && covers(ad, click))
}

/// Whether any wrap copy of the ad's stored bounding box contains `click`.
///
/// Boxes come from the unwrapped cells, so an ad straddling the seam is
/// matched from either side.
fn covers(ad: &AdPlacement, click: GridCell) -> bool {
    ad.bounds().is_some_and(|bounds| {
        WRAP_OFFSETS
            .iter()
            .any(|&(dx, dy)| bounds.translate(dx, dy).contains(click))
    })
}
