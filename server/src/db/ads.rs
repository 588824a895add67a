//! Postgres-backed ad repository.
//!
//! DESIGN
//! ======
//! Ads and their cells live in two tables; listings load the ad rows first and
//! then every position for those ids in one query, stitched together in
//! [`assemble`].
//!
//! `create_ad` takes a transaction-scoped advisory lock before reading the
//! active ads, so concurrent submissions are serialized across every server
//! instance sharing the database. The lock is released on commit or rollback.
//! `update_ad` takes the same lock, since switching an inactive ad back on
//! claims its cells again.

#[cfg(test)]
#[path = "ads_test.rs"]
mod ads_test;

use std::collections::HashMap;

use grid::ads::MediaType;
use grid::wrap::GridCell;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::services::ads::{AdError, AdRepository, AdRow, AdUpdate, NewAd, ensure_free, ensure_reactivation_free};

/// Advisory lock key guarding ad placement.
const PLACEMENT_LOCK_KEY: i64 = 0x6164_735f_6772_6964;

/// `(id, user_id, title, about, cta_url, media_url, media_type,
/// hide_from_time, hide_to_time, is_active, created_at)`
pub(crate) type AdRecord = (
    Uuid,
    Uuid,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
    Option<String>,
    Option<String>,
    bool,
    OffsetDateTime,
);

/// `(ad_id, x, y)`
pub(crate) type PositionRecord = (Uuid, i64, i64);

#[derive(Debug, Clone, Copy)]
enum AdFilter {
    Active,
    User(Uuid),
    Id(Uuid),
}

pub struct PgAdRepository {
    pool: PgPool,
}

impl PgAdRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AdRepository for PgAdRepository {
    async fn list_active(&self) -> Result<Vec<AdRow>, AdError> {
        let mut conn = self.pool.acquire().await?;
        Ok(load_ads(&mut conn, AdFilter::Active).await?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<AdRow>, AdError> {
        let mut conn = self.pool.acquire().await?;
        Ok(load_ads(&mut conn, AdFilter::User(user_id)).await?)
    }

    async fn create_ad(&self, ad: NewAd) -> Result<AdRow, AdError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(PLACEMENT_LOCK_KEY)
            .execute(tx.as_mut())
            .await?;

        let active = load_ads(tx.as_mut(), AdFilter::Active).await?;
        ensure_free(&active, &ad)?;

        let id = Uuid::new_v4();
        let created_at: OffsetDateTime = sqlx::query_scalar(
            "INSERT INTO ads (id, user_id, title, about, cta_url, media_url, media_type, hide_from_time, hide_to_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING created_at",
        )
        .bind(id)
        .bind(ad.user_id)
        .bind(&ad.title)
        .bind(&ad.about)
        .bind(&ad.cta_url)
        .bind(&ad.media_url)
        .bind(ad.media_type.as_str())
        .bind(&ad.hide_from_time)
        .bind(&ad.hide_to_time)
        .fetch_one(tx.as_mut())
        .await?;

        if !ad.positions.is_empty() {
            let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("INSERT INTO ad_positions (ad_id, x, y) ");
            builder.push_values(&ad.positions, |mut row, cell| {
                row.push_bind(id).push_bind(cell.x).push_bind(cell.y);
            });
            builder.build().execute(tx.as_mut()).await?;
        }

        tx.commit().await?;
        debug!(%id, checked = active.len(), "db: ad inserted");

        Ok(AdRow {
            id,
            user_id: ad.user_id,
            title: ad.title,
            about: ad.about,
            cta_url: ad.cta_url,
            media_url: ad.media_url,
            media_type: ad.media_type,
            hide_from_time: ad.hide_from_time,
            hide_to_time: ad.hide_to_time,
            is_active: true,
            created_at,
            positions: ad.positions,
        })
    }

    async fn update_ad(&self, id: Uuid, update: AdUpdate) -> Result<AdRow, AdError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(PLACEMENT_LOCK_KEY)
            .execute(tx.as_mut())
            .await?;

        let current = load_ads(tx.as_mut(), AdFilter::Id(id))
            .await?
            .into_iter()
            .next()
            .ok_or(AdError::NotFound(id))?;

        if update.is_active && !current.is_active {
            let active = load_ads(tx.as_mut(), AdFilter::Active).await?;
            ensure_reactivation_free(&active, &current)?;
            debug!(%id, checked = active.len(), "db: ad reactivation cleared");
        }

        sqlx::query(
            "UPDATE ads
             SET about = $2, cta_url = $3, hide_from_time = $4, hide_to_time = $5, is_active = $6
             WHERE id = $1",
        )
        .bind(id)
        .bind(&update.about)
        .bind(&update.cta_url)
        .bind(&update.hide_from_time)
        .bind(&update.hide_to_time)
        .bind(update.is_active)
        .execute(tx.as_mut())
        .await?;

        tx.commit().await?;

        Ok(AdRow {
            about: update.about,
            cta_url: update.cta_url,
            hide_from_time: update.hide_from_time,
            hide_to_time: update.hide_to_time,
            is_active: update.is_active,
            ..current
        })
    }

    async fn delete_ad(&self, id: Uuid) -> Result<(), AdError> {
        let result = sqlx::query("DELETE FROM ads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AdError::NotFound(id));
        }
        Ok(())
    }
}

async fn load_ads(conn: &mut PgConnection, filter: AdFilter) -> Result<Vec<AdRow>, sqlx::Error> {
    let records: Vec<AdRecord> = match filter {
        AdFilter::Active => {
            sqlx::query_as(
                "SELECT id, user_id, title, about, cta_url, media_url, media_type,
                        hide_from_time, hide_to_time, is_active, created_at
                 FROM ads
                 WHERE is_active
                 ORDER BY created_at DESC",
            )
            .fetch_all(&mut *conn)
            .await?
        }
        AdFilter::User(user_id) => {
            sqlx::query_as(
                "SELECT id, user_id, title, about, cta_url, media_url, media_type,
                        hide_from_time, hide_to_time, is_active, created_at
                 FROM ads
                 WHERE user_id = $1
                 ORDER BY created_at DESC",
            )
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?
        }
        AdFilter::Id(id) => {
            sqlx::query_as(
                "SELECT id, user_id, title, about, cta_url, media_url, media_type,
                        hide_from_time, hide_to_time, is_active, created_at
                 FROM ads
                 WHERE id = $1",
            )
            .bind(id)
            .fetch_all(&mut *conn)
            .await?
        }
    };

    if records.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = records.iter().map(|r| r.0).collect();
    let positions: Vec<PositionRecord> =
        sqlx::query_as("SELECT ad_id, x, y FROM ad_positions WHERE ad_id = ANY($1) ORDER BY id")
            .bind(ids.as_slice())
            .fetch_all(&mut *conn)
            .await?;

    Ok(assemble(records, positions))
}

/// Attach each position to its ad, keeping ad order and per-ad cell order.
pub(crate) fn assemble(records: Vec<AdRecord>, positions: Vec<PositionRecord>) -> Vec<AdRow> {
    let mut cells: HashMap<Uuid, Vec<GridCell>> = HashMap::new();
    for (ad_id, x, y) in positions {
        cells.entry(ad_id).or_default().push(GridCell::new(x, y));
    }

    records
        .into_iter()
        .map(
            |(id, user_id, title, about, cta_url, media_url, media_type, hide_from_time, hide_to_time, is_active, created_at)| {
                AdRow {
                    id,
                    user_id,
                    title,
                    about,
                    cta_url,
                    media_url,
                    media_type: MediaType::parse(&media_type).unwrap_or_default(),
                    hide_from_time,
                    hide_to_time,
                    is_active,
                    created_at,
                    positions: cells.remove(&id).unwrap_or_default(),
                }
            },
        )
        .collect()
}
