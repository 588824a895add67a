//! Ad service: submission rules, placement, and listings.
//!
//! DESIGN
//! ======
//! Route handlers translate HTTP into the request types here; this module owns
//! the rules. Cells are always computed server-side from `pixelCount` and the
//! anchor with the same layout the grid UI previews, so a client cannot claim
//! an arbitrary shape.
//!
//! CONCURRENCY
//! ===========
//! The final overlap check belongs to the repository. `create_ad` must read
//! the active ads, call [`ensure_free`], and insert under one exclusive lock
//! so two purchases racing for the same cells cannot both succeed.
//!
//! Deactivating an ad releases its cells. Turning it back on is a placement
//! like any other: `update_ad` must call [`ensure_reactivation_free`] under
//! the same lock when an inactive row becomes active.

#[cfg(test)]
#[path = "ads_test.rs"]
mod ads_test;

use grid::ads::{AdPlacement, MediaType};
use grid::placement::{self, PlacementError};
use grid::wrap::{GridCell, wrap_cell};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::config::AdSettings;
use crate::services::visibility::{self, MinuteOfDay, parse_hhmm};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AdError {
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error("ad not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A stored ad with its cells, as returned by every listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub about: Option<String>,
    pub cta_url: Option<String>,
    pub media_url: String,
    pub media_type: MediaType,
    pub hide_from_time: Option<String>,
    pub hide_to_time: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Cells as computed at submission, unwrapped.
    pub positions: Vec<GridCell>,
}

impl AdRow {
    /// The geometric view used for overlap checks.
    #[must_use]
    pub fn placement(&self) -> AdPlacement {
        AdPlacement {
            id: self.id,
            cells: self.positions.clone(),
            cta_url: self.cta_url.clone(),
            media_url: Some(self.media_url.clone()),
            media_type: self.media_type,
        }
    }

    #[must_use]
    pub fn is_visible_at(&self, now: MinuteOfDay) -> bool {
        visibility::is_visible(self.hide_from_time.as_deref(), self.hide_to_time.as_deref(), now)
    }
}

/// A validated submission ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAd {
    pub user_id: Uuid,
    pub title: Option<String>,
    pub about: Option<String>,
    pub cta_url: Option<String>,
    pub media_url: String,
    pub media_type: MediaType,
    pub hide_from_time: Option<String>,
    pub hide_to_time: Option<String>,
    /// Canonical anchor the cells were laid out from.
    pub anchor: GridCell,
    pub positions: Vec<GridCell>,
}

/// Fields an advertiser may change after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdUpdate {
    pub about: Option<String>,
    pub cta_url: Option<String>,
    pub hide_from_time: Option<String>,
    pub hide_to_time: Option<String>,
    pub is_active: bool,
}

/// `POST /api/ads/submit` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitAdRequest {
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub about: Option<String>,
    pub cta_url: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub hide_from_time: Option<String>,
    pub hide_to_time: Option<String>,
    pub pixel_count: Option<u32>,
    pub anchor: Option<GridCell>,
}

/// `PUT /api/ads/update` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAdRequest {
    pub ad_id: Option<Uuid>,
    pub about: Option<String>,
    pub cta_url: Option<String>,
    pub hide_from_time: Option<String>,
    pub hide_to_time: Option<String>,
    pub is_active: Option<bool>,
}

/// Ad persistence. Implemented over Postgres and, in tests, over memory.
#[async_trait::async_trait]
pub trait AdRepository: Send + Sync {
    /// Ads with `is_active` set, newest first.
    async fn list_active(&self) -> Result<Vec<AdRow>, AdError>;

    /// Every ad owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<AdRow>, AdError>;

    /// Insert `ad` unless its cells overlap an active ad. The check and the
    /// insert are atomic with respect to other `create_ad` calls.
    async fn create_ad(&self, ad: NewAd) -> Result<AdRow, AdError>;

    /// Apply `update`. When it switches an inactive ad back on, the ad's cells
    /// are checked against the other active ads under the `create_ad` lock.
    async fn update_ad(&self, id: Uuid, update: AdUpdate) -> Result<AdRow, AdError>;

    /// Delete an ad and its cells.
    async fn delete_ad(&self, id: Uuid) -> Result<(), AdError>;
}

// =============================================================================
// RULES
// =============================================================================

/// Reject `ad` if any of its cells lands on a cell held by `existing`.
///
/// # Errors
///
/// Returns [`PlacementError::Occupied`] on overlap.
pub fn ensure_free(existing: &[AdRow], ad: &NewAd) -> Result<(), AdError> {
    check_cells(existing.iter(), &ad.positions, ad.anchor)
}

/// Reject re-activating `ad` if another active ad took its cells meanwhile.
/// `ad` itself is skipped if it appears in `active`.
///
/// # Errors
///
/// Returns [`PlacementError::Occupied`] on overlap.
pub fn ensure_reactivation_free(active: &[AdRow], ad: &AdRow) -> Result<(), AdError> {
    // Cells are laid out row-major from the anchor.
    let anchor = ad.positions.first().map_or(GridCell::new(0, 0), |c| wrap_cell(*c));
    check_cells(active.iter().filter(|other| other.id != ad.id), &ad.positions, anchor)
}

fn check_cells<'a>(existing: impl Iterator<Item = &'a AdRow>, cells: &[GridCell], anchor: GridCell) -> Result<(), AdError> {
    let placements: Vec<AdPlacement> = existing.map(AdRow::placement).collect();
    if placement::overlaps(cells, &placements) {
        return Err(PlacementError::Occupied { anchor }.into());
    }
    Ok(())
}

/// Check a submission and lay out its cells.
///
/// # Errors
///
/// Returns [`AdError::Invalid`] for missing or malformed fields and
/// [`AdError::Placement`] for a pixel count outside the allowed range.
pub fn validate_submission(req: SubmitAdRequest, settings: &AdSettings) -> Result<NewAd, AdError> {
    let media_url = non_blank(req.media_url);
    let (Some(user_id), Some(media_url)) = (req.user_id, media_url) else {
        return Err(AdError::Invalid("Missing required fields: userId and mediaUrl are required".into()));
    };
    if !media_url.contains(&settings.media_host) {
        return Err(AdError::Invalid(format!("Invalid media URL. Must be a {} URL.", settings.media_host)));
    }
    let media_type = req
        .media_type
        .as_deref()
        .and_then(MediaType::parse)
        .ok_or_else(|| AdError::Invalid("mediaType must be image or video".into()))?;

    let pixel_count = req
        .pixel_count
        .ok_or_else(|| AdError::Invalid("pixelCount is required".into()))?;
    let pixel_count = placement::validate_pixel_count(pixel_count, settings.max_pixel_count)?;
    let anchor = wrap_cell(req.anchor.ok_or_else(|| AdError::Invalid("anchor is required".into()))?);

    let (hide_from_time, hide_to_time) = validate_hide_window(req.hide_from_time, req.hide_to_time)?;

    Ok(NewAd {
        user_id,
        title: non_blank(req.title),
        about: non_blank(req.about),
        cta_url: non_blank(req.cta_url),
        media_url,
        media_type,
        hide_from_time,
        hide_to_time,
        anchor,
        positions: placement::compute_cells(pixel_count, anchor),
    })
}

/// Check an update request. A missing `isActive` re-activates the ad.
///
/// # Errors
///
/// Returns [`AdError::Invalid`] when `adId` is missing or a hide time is
/// malformed.
pub fn validate_update(req: UpdateAdRequest) -> Result<(Uuid, AdUpdate), AdError> {
    let id = req.ad_id.ok_or_else(|| AdError::Invalid("Ad ID is required".into()))?;
    let (hide_from_time, hide_to_time) = validate_hide_window(req.hide_from_time, req.hide_to_time)?;
    Ok((
        id,
        AdUpdate {
            about: non_blank(req.about),
            cta_url: non_blank(req.cta_url),
            hide_from_time,
            hide_to_time,
            is_active: req.is_active.unwrap_or(true),
        },
    ))
}

fn validate_hide_window(
    from: Option<String>,
    to: Option<String>,
) -> Result<(Option<String>, Option<String>), AdError> {
    let check = |field: &str, value: Option<String>| match non_blank(value) {
        Some(v) if parse_hhmm(&v).is_none() => Err(AdError::Invalid(format!("{field} must be HH:MM"))),
        other => Ok(other),
    };
    Ok((check("hideFromTime", from)?, check("hideToTime", to)?))
}

/// Empty strings from form fields mean "not set".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Validate and store a new ad.
///
/// # Errors
///
/// Validation errors, [`PlacementError::Occupied`] on overlap, or a
/// repository error.
pub async fn submit_ad(repo: &dyn AdRepository, settings: &AdSettings, req: SubmitAdRequest) -> Result<AdRow, AdError> {
    let ad = validate_submission(req, settings)?;
    let anchor = ad.anchor;
    let row = repo.create_ad(ad).await?;
    info!(ad_id = %row.id, user_id = %row.user_id, x = anchor.x, y = anchor.y, cells = row.positions.len(), "ads: created");
    Ok(row)
}

/// Active ads not inside their hide window at `now`, newest first.
///
/// # Errors
///
/// Returns a repository error if the listing fails.
pub async fn active_ads(repo: &dyn AdRepository, now: MinuteOfDay) -> Result<Vec<AdRow>, AdError> {
    let mut ads = repo.list_active().await?;
    ads.retain(|ad| ad.is_visible_at(now));
    Ok(ads)
}

/// All ads of one advertiser, including inactive and hidden ones.
///
/// # Errors
///
/// Returns a repository error if the listing fails.
pub async fn user_ads(repo: &dyn AdRepository, user_id: Uuid) -> Result<Vec<AdRow>, AdError> {
    repo.list_by_user(user_id).await
}

/// Apply an advertiser's edits.
///
/// # Errors
///
/// Validation errors, [`AdError::NotFound`], [`PlacementError::Occupied`]
/// when re-activation collides with a newer ad, or a repository error.
pub async fn update_ad(repo: &dyn AdRepository, req: UpdateAdRequest) -> Result<AdRow, AdError> {
    let (id, update) = validate_update(req)?;
    let row = repo.update_ad(id, update).await?;
    info!(ad_id = %row.id, is_active = row.is_active, "ads: updated");
    Ok(row)
}

/// Remove an ad.
///
/// # Errors
///
/// [`AdError::NotFound`] or a repository error.
pub async fn delete_ad(repo: &dyn AdRepository, id: Uuid) -> Result<(), AdError> {
    repo.delete_ad(id).await?;
    info!(ad_id = %id, "ads: deleted");
    Ok(())
}
