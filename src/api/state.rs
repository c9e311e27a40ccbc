//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ApiConfig, Config};
use crate::dataset::{Dataset, DatasetCache, DatasetSource, SpreadsheetReader};
use crate::prepare::{RegionFilter, SectorAllowList};

/// Shared application state for all handlers
pub struct AppState {
    /// Cache of the most recently loaded dataset
    pub cache: Arc<DatasetCache>,
    /// Source used while no upload is active
    pub default_source: DatasetSource,
    /// Uploaded dataset, replacing the default source while set
    upload: RwLock<Option<DatasetSource>>,
    pub regions: RegionFilter,
    pub sectors: SectorAllowList,
    pub max_upload_bytes: usize,
    /// API configuration
    pub config: Arc<ApiConfig>,
    pub started_at: DateTime<Utc>,
    start_time: Instant,
}

impl AppState {
    /// Create state from the full configuration
    pub fn new(config: &Config) -> Self {
        let reader = SpreadsheetReader::new(config.dataset.load_options());
        Self::with_cache(Arc::new(DatasetCache::with_reader(reader)), config)
    }

    /// Create state around an existing cache
    pub fn with_cache(cache: Arc<DatasetCache>, config: &Config) -> Self {
        Self {
            cache,
            default_source: config.dataset.default_source(),
            upload: RwLock::new(None),
            regions: config.regions.filter(),
            sectors: config.views.sector_allow_list(),
            max_upload_bytes: config.dataset.max_upload_bytes,
            config: Arc::new(config.api.clone()),
            started_at: Utc::now(),
            start_time: Instant::now(),
        }
    }

    /// The upload if one is active, else the default source
    pub async fn active_source(&self) -> DatasetSource {
        match self.upload.read().await.as_ref() {
            Some(upload) => upload.clone(),
            None => self.default_source.clone(),
        }
    }

    /// Load the active source through the cache
    pub async fn load_active(&self) -> ApiResult<(DatasetSource, Arc<Dataset>)> {
        let source = self.active_source().await;
        let dataset = self.load(source.clone()).await?;
        Ok((source, dataset))
    }

    /// Load an upload and make it the active source
    ///
    /// The active source only changes if the upload loads cleanly.
    pub async fn replace_upload(&self, source: DatasetSource) -> ApiResult<Arc<Dataset>> {
        let mut upload = self.upload.write().await;
        let dataset = self.load(source.clone()).await?;
        tracing::info!(source = %source, records = dataset.len(), "Upload is now the active dataset");
        *upload = Some(source);
        Ok(dataset)
    }

    /// Drop the upload and fall back to the default source
    pub async fn clear_upload(&self) -> bool {
        let previous = self.upload.write().await.take();
        self.cache.invalidate();
        previous.is_some()
    }

    pub async fn has_upload(&self) -> bool {
        self.upload.read().await.is_some()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    async fn load(&self, source: DatasetSource) -> ApiResult<Arc<Dataset>> {
        let cache = Arc::clone(&self.cache);
        let dataset = tokio::task::spawn_blocking(move || cache.load(&source))
            .await
            .map_err(|e| ApiError::Internal(format!("Dataset load task failed: {}", e)))??;
        Ok(dataset)
    }
}

