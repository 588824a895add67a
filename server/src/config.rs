//! Server configuration parsed from environment variables.
//!
//! Required:
//! - `DATABASE_URL`
//!
//! Optional:
//! - `PORT`: default 3000
//! - `DB_MAX_CONNECTIONS`: default 5
//! - `MEDIA_HOST`: host every media URL must point at, default `cloudinary.com`
//! - `MAX_PIXEL_COUNT`: largest purchasable region, default 100
//! - `VISIBILITY_UTC_OFFSET_MINUTES`: clock used for hide windows, default 0 (UTC)
//!
//! Unparseable optional values fall back to their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use time::UtcOffset;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MEDIA_HOST: &str = "cloudinary.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingVar(&'static str),
    #[error("{var} out of range: {value}")]
    OutOfRange { var: &'static str, value: i64 },
}

/// Rules applied to ad submissions and listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdSettings {
    pub media_host: String,
    pub max_pixel_count: u32,
    /// Offset applied to UTC before checking hide windows.
    pub utc_offset: UtcOffset,
}

impl Default for AdSettings {
    fn default() -> Self {
        Self {
            media_host: DEFAULT_MEDIA_HOST.to_string(),
            max_pixel_count: grid::consts::MAX_PIXEL_COUNT,
            utc_offset: UtcOffset::UTC,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub ads: AdSettings,
}

impl ServerConfig {
    /// Build typed config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `DATABASE_URL` is unset or the UTC offset is
    /// not a valid offset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar("DATABASE_URL"))?;

        let media_host = lookup("MEDIA_HOST")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MEDIA_HOST.to_string());

        let offset_minutes: i64 = env_parse(&lookup, "VISIBILITY_UTC_OFFSET_MINUTES", 0);
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(|secs| i32::try_from(secs).ok())
            .and_then(|secs| UtcOffset::from_whole_seconds(secs).ok())
            .ok_or(ConfigError::OutOfRange { var: "VISIBILITY_UTC_OFFSET_MINUTES", value: offset_minutes })?;

        Ok(Self {
            database_url,
            port: env_parse(&lookup, "PORT", DEFAULT_PORT),
            db_max_connections: env_parse(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            ads: AdSettings {
                media_host,
                max_pixel_count: env_parse(&lookup, "MAX_PIXEL_COUNT", grid::consts::MAX_PIXEL_COUNT),
                utc_offset,
            },
        })
    }
}

fn env_parse<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
