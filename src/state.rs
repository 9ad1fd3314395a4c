//! Application state shared across all request handlers

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::database::{DurableStore, OfflineStore, RedbStore};
use crate::fallback::FallbackBuffer;
use crate::geo::GeoLocator;
use crate::portfolio::{PortfolioData, PortfolioError};
use crate::recorder::VisitRecorder;

/// Cheap to clone; everything inside is behind an `Arc`
#[derive(Clone)]
pub struct AppState {
    pub portfolio: Arc<PortfolioData>,
    pub store: Arc<dyn DurableStore>,
    pub recorder: Arc<VisitRecorder>,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),
}

impl AppState {
    pub fn new(
        store: Arc<dyn DurableStore>,
        portfolio: PortfolioData,
        geo: GeoLocator,
        visit_buffer_capacity: usize,
    ) -> Self {
        let recorder = VisitRecorder::new(
            store.clone(),
            geo,
            FallbackBuffer::new(visit_buffer_capacity),
        );

        Self {
            portfolio: Arc::new(portfolio),
            store,
            recorder: Arc::new(recorder),
        }
    }

    /// Builds state from configuration
    ///
    /// A database that cannot be opened does not abort startup: the server
    /// runs in offline mode, buffering visits in memory and rejecting
    /// contact messages with 503. A missing geolocation database only
    /// leaves visit locations as "Unknown".
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let portfolio = PortfolioData::load(config.portfolio_data.as_deref())?;

        let geo = GeoLocator::from_path(config.geo_data.as_deref());

        let store: Arc<dyn DurableStore> = match RedbStore::open(&config.database_url) {
            Ok(store) => {
                info!("Using database: {}", config.database_url);
                Arc::new(store)
            }
            Err(err) => {
                warn!("Running in offline mode, database unavailable: {err}");
                Arc::new(OfflineStore)
            }
        };

        Ok(Self::new(
            store,
            portfolio,
            geo,
            config.visit_buffer_capacity,
        ))
    }
}
