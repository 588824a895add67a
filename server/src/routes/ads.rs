//! Ad HTTP routes.
//!
//! Bodies and responses use camelCase JSON. Every failure is a status code
//! plus `{ "error": "..." }`, including bodies or query strings that fail to
//! extract.

#[cfg(test)]
#[path = "ads_test.rs"]
mod ads_test;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use grid::placement::PlacementError;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::services::ads::{self, AdError, AdRow, SubmitAdRequest, UpdateAdRequest};
use crate::services::visibility;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

#[derive(Debug, Serialize)]
pub struct AdsResponse {
    pub ads: Vec<AdRow>,
}

#[derive(Debug, Serialize)]
pub struct AdResponse {
    pub success: bool,
    pub ad: AdRow,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    pub ad_id: Option<String>,
}

/// `GET /api/ads/active`: active ads outside their hide window, newest first.
pub async fn active_ads(State(state): State<AppState>) -> Result<Json<AdsResponse>, ApiError> {
    let now = visibility::current_minute(state.settings.utc_offset);
    let ads = ads::active_ads(state.ads.as_ref(), now).await.map_err(api_error)?;
    Ok(Json(AdsResponse { ads }))
}

/// `GET /api/ads/user?userId=`: every ad of one advertiser.
pub async fn user_ads(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<AdsResponse>, ApiError> {
    let Query(query) = query.map_err(|e| rejection(e.status(), e.body_text()))?;
    let user_id = required_id(query.user_id.as_deref(), "User ID is required")?;
    let ads = ads::user_ads(state.ads.as_ref(), user_id).await.map_err(api_error)?;
    Ok(Json(AdsResponse { ads }))
}

/// `POST /api/ads/submit`: place and store a new ad.
pub async fn submit_ad(
    State(state): State<AppState>,
    body: Result<Json<SubmitAdRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AdResponse>), ApiError> {
    let Json(body) = body.map_err(|e| rejection(e.status(), e.body_text()))?;
    let ad = ads::submit_ad(state.ads.as_ref(), &state.settings, body)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(AdResponse { success: true, ad })))
}

/// `PUT /api/ads/update`: edit copy, link, hide window, and active flag.
pub async fn update_ad(
    State(state): State<AppState>,
    body: Result<Json<UpdateAdRequest>, JsonRejection>,
) -> Result<Json<AdResponse>, ApiError> {
    let Json(body) = body.map_err(|e| rejection(e.status(), e.body_text()))?;
    let ad = ads::update_ad(state.ads.as_ref(), body).await.map_err(api_error)?;
    Ok(Json(AdResponse { success: true, ad }))
}

/// `DELETE /api/ads/delete?adId=`: remove an ad and its cells.
pub async fn delete_ad(
    State(state): State<AppState>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Query(query) = query.map_err(|e| rejection(e.status(), e.body_text()))?;
    let ad_id = required_id(query.ad_id.as_deref(), "Ad ID is required")?;
    ads::delete_ad(state.ads.as_ref(), ad_id).await.map_err(api_error)?;
    Ok(Json(DeleteResponse { success: true, message: "Ad deleted successfully".into() }))
}

fn required_id(raw: Option<&str>, missing: &str) -> Result<Uuid, ApiError> {
    let raw = raw.filter(|v| !v.is_empty()).ok_or_else(|| api_error(AdError::Invalid(missing.into())))?;
    Uuid::parse_str(raw).map_err(|_| api_error(AdError::Invalid(format!("invalid id: {raw}"))))
}

/// Extractor failures keep axum's status but use the JSON error body.
fn rejection(status: StatusCode, message: String) -> ApiError {
    (status, Json(ErrorBody { error: message }))
}

pub(crate) fn ad_error_to_status(err: &AdError) -> StatusCode {
    match err {
        AdError::Invalid(_) | AdError::Placement(PlacementError::InvalidPixelCount { .. }) => StatusCode::BAD_REQUEST,
        AdError::Placement(PlacementError::Occupied { .. }) => StatusCode::CONFLICT,
        AdError::NotFound(_) => StatusCode::NOT_FOUND,
        AdError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: AdError) -> ApiError {
    let status = ad_error_to_status(&err);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %err, "ads: request failed");
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    (status, Json(ErrorBody { error: message }))
}
