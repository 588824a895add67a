//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the ad repository behind a trait object, so handlers run unchanged
//! against Postgres in production and against memory in tests, plus the ad
//! rules from configuration.

use std::sync::Arc;

use crate::config::AdSettings;
use crate::services::ads::AdRepository;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub ads: Arc<dyn AdRepository>,
    pub settings: Arc<AdSettings>,
}

impl AppState {
    #[must_use]
    pub fn new(ads: Arc<dyn AdRepository>, settings: AdSettings) -> Self {
        Self { ads, settings: Arc::new(settings) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
