use super::*;
use crate::state::test_helpers::{MemoryAdRepository, submit_request};

fn settings() -> AdSettings {
    AdSettings::default()
}

fn row_at(x: i64, y: i64, pixel_count: u32) -> AdRow {
    AdRow {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: None,
        about: None,
        cta_url: None,
        media_url: "https://res.cloudinary.com/x.png".into(),
        media_type: MediaType::Image,
        hide_from_time: None,
        hide_to_time: None,
        is_active: true,
        created_at: OffsetDateTime::now_utc(),
        positions: placement::compute_cells(pixel_count, GridCell::new(x, y)),
    }
}

fn invalid_message(err: AdError) -> String {
    match err {
        AdError::Invalid(msg) => msg,
        other => panic!("expected Invalid, got {other:?}"),
    }
}

// =============================================================
// validate_submission
// =============================================================

#[test]
fn submission_lays_out_cells_from_anchor() {
    let ad = validate_submission(submit_request(Uuid::new_v4(), 10, 20), &settings()).unwrap();
    assert_eq!(ad.anchor, GridCell::new(10, 20));
    assert_eq!(
        ad.positions,
        vec![GridCell::new(10, 20), GridCell::new(11, 20), GridCell::new(10, 21), GridCell::new(11, 21)]
    );
    assert_eq!(ad.media_type, MediaType::Image);
}

#[test]
fn submission_wraps_anchor_but_not_cells() {
    let ad = validate_submission(submit_request(Uuid::new_v4(), -1, 5000), &settings()).unwrap();
    assert_eq!(ad.anchor, GridCell::new(4999, 0));
    assert!(ad.positions.contains(&GridCell::new(5000, 1)));
}

#[test]
fn submission_requires_user_and_media() {
    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.user_id = None;
    let msg = invalid_message(validate_submission(req, &settings()).unwrap_err());
    assert!(msg.contains("userId"));

    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.media_url = Some(String::new());
    assert!(matches!(validate_submission(req, &settings()), Err(AdError::Invalid(_))));
}

#[test]
fn submission_requires_media_host() {
    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.media_url = Some("https://evil.example/pic.png".into());
    let msg = invalid_message(validate_submission(req, &settings()).unwrap_err());
    assert!(msg.contains("cloudinary.com"));
}

#[test]
fn submission_requires_known_media_type() {
    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.media_type = Some("gif".into());
    assert!(matches!(validate_submission(req, &settings()), Err(AdError::Invalid(_))));

    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.media_type = Some("video".into());
    assert_eq!(validate_submission(req, &settings()).unwrap().media_type, MediaType::Video);
}

#[test]
fn submission_enforces_pixel_count_range() {
    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.pixel_count = Some(0);
    assert!(matches!(
        validate_submission(req, &settings()),
        Err(AdError::Placement(PlacementError::InvalidPixelCount { count: 0, max: 100 }))
    ));

    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.pixel_count = Some(101);
    assert!(validate_submission(req, &settings()).is_err());

    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.pixel_count = Some(100);
    assert_eq!(validate_submission(req, &settings()).unwrap().positions.len(), 100);
}

#[test]
fn submission_requires_pixel_count_and_anchor() {
    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.pixel_count = None;
    assert!(invalid_message(validate_submission(req, &settings()).unwrap_err()).contains("pixelCount"));

    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.anchor = None;
    assert!(invalid_message(validate_submission(req, &settings()).unwrap_err()).contains("anchor"));
}

#[test]
fn submission_checks_hide_times() {
    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.hide_from_time = Some("25:00".into());
    req.hide_to_time = Some("06:00".into());
    assert!(invalid_message(validate_submission(req, &settings()).unwrap_err()).contains("hideFromTime"));

    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.hide_from_time = Some("22:00".into());
    req.hide_to_time = Some(String::new());
    let ad = validate_submission(req, &settings()).unwrap();
    assert_eq!(ad.hide_from_time.as_deref(), Some("22:00"));
    assert_eq!(ad.hide_to_time, None);
}

#[test]
fn submission_blank_optionals_become_none() {
    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.title = Some("  ".into());
    req.cta_url = Some(String::new());
    let ad = validate_submission(req, &settings()).unwrap();
    assert_eq!(ad.title, None);
    assert_eq!(ad.cta_url, None);
}

#[test]
fn submission_honours_configured_limits() {
    let custom = AdSettings { media_host: "media.example".into(), max_pixel_count: 4, ..AdSettings::default() };
    let mut req = submit_request(Uuid::new_v4(), 0, 0);
    req.media_url = Some("https://media.example/a.png".into());
    assert!(validate_submission(req.clone(), &custom).is_ok());
    req.pixel_count = Some(5);
    assert!(validate_submission(req, &custom).is_err());
}

// =============================================================
// validate_update
// =============================================================

#[test]
fn update_requires_ad_id() {
    let err = validate_update(UpdateAdRequest::default()).unwrap_err();
    assert_eq!(invalid_message(err), "Ad ID is required");
}

#[test]
fn update_defaults_to_active() {
    let id = Uuid::new_v4();
    let (got, update) = validate_update(UpdateAdRequest { ad_id: Some(id), ..Default::default() }).unwrap();
    assert_eq!(got, id);
    assert!(update.is_active);

    let (_, update) =
        validate_update(UpdateAdRequest { ad_id: Some(id), is_active: Some(false), ..Default::default() }).unwrap();
    assert!(!update.is_active);
}

#[test]
fn update_rejects_bad_hide_time() {
    let req = UpdateAdRequest { ad_id: Some(Uuid::new_v4()), hide_to_time: Some("6am".into()), ..Default::default() };
    assert!(invalid_message(validate_update(req).unwrap_err()).contains("hideToTime"));
}

// =============================================================
// ensure_free
// =============================================================

#[test]
fn ensure_free_accepts_disjoint() {
    let existing = vec![row_at(0, 0, 4)];
    let ad = validate_submission(submit_request(Uuid::new_v4(), 2, 0), &settings()).unwrap();
    assert!(ensure_free(&existing, &ad).is_ok());
}

#[test]
fn ensure_free_rejects_across_seam() {
    let existing = vec![row_at(4998, 4998, 9)];
    let ad = validate_submission(submit_request(Uuid::new_v4(), 0, 0), &settings()).unwrap();
    let err = ensure_free(&existing, &ad).unwrap_err();
    assert!(matches!(err, AdError::Placement(PlacementError::Occupied { anchor }) if anchor == GridCell::new(0, 0)));
}

#[test]
fn reactivation_ignores_the_ad_itself() {
    let ad = row_at(10, 10, 4);
    assert!(ensure_reactivation_free(std::slice::from_ref(&ad), &ad).is_ok());
}

#[test]
fn reactivation_rejects_overlap_reporting_wrapped_anchor() {
    let ad = row_at(4999, 0, 4);
    let newer = row_at(0, 1, 1);
    let err = ensure_reactivation_free(&[newer], &ad).unwrap_err();
    assert!(matches!(err, AdError::Placement(PlacementError::Occupied { anchor }) if anchor == GridCell::new(4999, 0)));
}

// =============================================================
// Operations over the in-memory repository
// =============================================================

#[tokio::test]
async fn submit_then_list_active() {
    let repo = MemoryAdRepository::new();
    let user = Uuid::new_v4();
    let first = submit_ad(&repo, &settings(), submit_request(user, 0, 0)).await.unwrap();
    let second = submit_ad(&repo, &settings(), submit_request(user, 10, 10)).await.unwrap();
    assert!(first.is_active);

    let ads = active_ads(&repo, 0).await.unwrap();
    let ids: Vec<_> = ads.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn submit_rejects_overlap_and_stores_nothing() {
    let repo = MemoryAdRepository::new();
    submit_ad(&repo, &settings(), submit_request(Uuid::new_v4(), 0, 0)).await.unwrap();
    let err = submit_ad(&repo, &settings(), submit_request(Uuid::new_v4(), 1, 1)).await.unwrap_err();
    assert!(matches!(err, AdError::Placement(PlacementError::Occupied { .. })));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn inactive_ads_free_their_cells() {
    let repo = MemoryAdRepository::new();
    let row = submit_ad(&repo, &settings(), submit_request(Uuid::new_v4(), 0, 0)).await.unwrap();
    update_ad(&repo, UpdateAdRequest { ad_id: Some(row.id), is_active: Some(false), ..Default::default() })
        .await
        .unwrap();
    assert!(submit_ad(&repo, &settings(), submit_request(Uuid::new_v4(), 0, 0)).await.is_ok());
}

#[tokio::test]
async fn editing_a_displaced_ad_cannot_reactivate_it() {
    let repo = MemoryAdRepository::new();
    let first = submit_ad(&repo, &settings(), submit_request(Uuid::new_v4(), 0, 0)).await.unwrap();
    update_ad(&repo, UpdateAdRequest { ad_id: Some(first.id), is_active: Some(false), ..Default::default() })
        .await
        .unwrap();
    let second = submit_ad(&repo, &settings(), submit_request(Uuid::new_v4(), 0, 0)).await.unwrap();

    // No isActive means "turn it back on".
    let err = update_ad(&repo, UpdateAdRequest { ad_id: Some(first.id), about: Some("new".into()), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, AdError::Placement(PlacementError::Occupied { .. })));

    let active = repo.list_active().await.unwrap();
    assert_eq!(active.iter().map(|a| a.id).collect::<Vec<_>>(), vec![second.id]);
    let stored = repo.list_by_user(first.user_id).await.unwrap();
    assert!(!stored[0].is_active);
    assert_eq!(stored[0].about.as_deref(), Some("Best slice on the grid"));
}

#[tokio::test]
async fn reactivation_succeeds_when_cells_still_free() {
    let repo = MemoryAdRepository::new();
    let first = submit_ad(&repo, &settings(), submit_request(Uuid::new_v4(), 0, 0)).await.unwrap();
    update_ad(&repo, UpdateAdRequest { ad_id: Some(first.id), is_active: Some(false), ..Default::default() })
        .await
        .unwrap();
    submit_ad(&repo, &settings(), submit_request(Uuid::new_v4(), 10, 10)).await.unwrap();

    let row = update_ad(&repo, UpdateAdRequest { ad_id: Some(first.id), is_active: Some(true), ..Default::default() })
        .await
        .unwrap();
    assert!(row.is_active);
    assert_eq!(repo.list_active().await.unwrap().len(), 2);
}

#[tokio::test]
async fn active_ads_hides_within_window() {
    let repo = MemoryAdRepository::new();
    let mut hidden = row_at(0, 0, 1);
    hidden.hide_from_time = Some("10:00".into());
    hidden.hide_to_time = Some("18:00".into());
    let shown = row_at(5, 5, 1);
    repo.seed(hidden.clone()).await;
    repo.seed(shown.clone()).await;

    let at_noon = active_ads(&repo, 12 * 60).await.unwrap();
    assert_eq!(at_noon.iter().map(|a| a.id).collect::<Vec<_>>(), vec![shown.id]);

    let at_night = active_ads(&repo, 20 * 60).await.unwrap();
    assert_eq!(at_night.len(), 2);
}

#[tokio::test]
async fn user_ads_include_inactive() {
    let repo = MemoryAdRepository::new();
    let user = Uuid::new_v4();
    let mut inactive = row_at(0, 0, 1);
    inactive.user_id = user;
    inactive.is_active = false;
    repo.seed(inactive.clone()).await;
    repo.seed(row_at(9, 9, 1)).await;

    let ads = user_ads(&repo, user).await.unwrap();
    assert_eq!(ads.len(), 1);
    assert_eq!(ads[0].id, inactive.id);
    assert!(active_ads(&repo, 0).await.unwrap().iter().all(|a| a.id != inactive.id));
}

#[tokio::test]
async fn update_replaces_editable_fields() {
    let repo = MemoryAdRepository::new();
    let row = submit_ad(&repo, &settings(), submit_request(Uuid::new_v4(), 0, 0)).await.unwrap();
    let updated = update_ad(
        &repo,
        UpdateAdRequest {
            ad_id: Some(row.id),
            about: Some("new copy".into()),
            hide_from_time: Some("01:00".into()),
            hide_to_time: Some("02:00".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.about.as_deref(), Some("new copy"));
    assert_eq!(updated.cta_url, None);
    assert_eq!(updated.hide_from_time.as_deref(), Some("01:00"));
    assert_eq!(updated.title, row.title);
    assert_eq!(updated.positions, row.positions);
}

#[tokio::test]
async fn update_and_delete_unknown_ad() {
    let repo = MemoryAdRepository::new();
    let id = Uuid::new_v4();
    let err = update_ad(&repo, UpdateAdRequest { ad_id: Some(id), ..Default::default() }).await.unwrap_err();
    assert!(matches!(err, AdError::NotFound(got) if got == id));
    assert!(matches!(delete_ad(&repo, id).await, Err(AdError::NotFound(_))));
}

#[tokio::test]
async fn delete_removes_ad() {
    let repo = MemoryAdRepository::new();
    let row = submit_ad(&repo, &settings(), submit_request(Uuid::new_v4(), 0, 0)).await.unwrap();
    delete_ad(&repo, row.id).await.unwrap();
    assert_eq!(repo.len().await, 0);
}

#[tokio::test]
async fn concurrent_submissions_for_same_cells_admit_one() {
    let repo = std::sync::Arc::new(MemoryAdRepository::new());
    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            submit_ad(repo.as_ref(), &AdSettings::default(), submit_request(Uuid::new_v4(), 100, 100)).await
        }));
    }
    let mut ok = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            ok += 1;
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(repo.len().await, 1);
}

#[test]
fn row_serializes_camel_case() {
    let row = row_at(1, 2, 1);
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["mediaType"], "image");
    assert_eq!(json["isActive"], true);
    assert_eq!(json["positions"][0]["x"], 1);
    assert!(json["createdAt"].is_string());
    assert!(json.get("hideFromTime").is_some());
}
