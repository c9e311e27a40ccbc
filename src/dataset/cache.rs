//! Dataset cache
//!
//! Holds the most recently loaded dataset keyed by its load parameters.
//! Loading with the same key returns the cached dataset without re-parsing;
//! a different key replaces the entry. `invalidate` drops it explicitly.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::dataset::error::DatasetResult;
use crate::dataset::loader::{load_dataset, DatasetSource, LoadOptions};
use crate::dataset::records::Dataset;

/// Identity of a load request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Path(PathBuf),
    Upload {
        file_name: String,
        len: usize,
        crc32: u32,
    },
}

impl CacheKey {
    pub fn for_source(source: &DatasetSource) -> Self {
        match source {
            DatasetSource::Path(path) => CacheKey::Path(path.clone()),
            DatasetSource::Upload { file_name, bytes } => CacheKey::Upload {
                file_name: file_name.clone(),
                len: bytes.len(),
                crc32: crc32fast::hash(bytes),
            },
        }
    }
}

/// Turns a source into a dataset
pub trait SourceReader: Send + Sync {
    fn read(&self, source: &DatasetSource) -> DatasetResult<Dataset>;
}

/// Reads spreadsheets and CSV files from disk or upload bytes
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetReader {
    options: LoadOptions,
}

impl SpreadsheetReader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }
}

impl SourceReader for SpreadsheetReader {
    fn read(&self, source: &DatasetSource) -> DatasetResult<Dataset> {
        load_dataset(source, &self.options)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

struct CacheEntry {
    key: CacheKey,
    dataset: Arc<Dataset>,
}

/// Single-entry dataset cache
pub struct DatasetCache {
    reader: Box<dyn SourceReader>,
    entry: Mutex<Option<CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCache {
    /// Create a cache backed by the spreadsheet reader
    pub fn new() -> Self {
        Self::with_reader(SpreadsheetReader::default())
    }

    /// Create a cache backed by a custom reader
    pub fn with_reader(reader: impl SourceReader + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            entry: Mutex::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Return the dataset for `source`, loading it on a key change
    ///
    /// A failed load leaves the cache empty.
    pub fn load(&self, source: &DatasetSource) -> DatasetResult<Arc<Dataset>> {
        let key = CacheKey::for_source(source);
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(cached) = entry.as_ref().filter(|e| e.key == key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(source = %source, "Dataset cache hit");
            return Ok(Arc::clone(&cached.dataset));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        *entry = None;

        let dataset = Arc::new(self.reader.read(source)?);
        tracing::info!(
            source = %source,
            records = dataset.len(),
            columns = dataset.table().width(),
            "Dataset loaded"
        );

        *entry = Some(CacheEntry {
            key,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Drop the cached dataset
    pub fn invalidate(&self) {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        if entry.take().is_some() {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Dataset cache invalidated");
        }
    }

    /// Key of the cached dataset, if any
    pub fn cached_key(&self) -> Option<CacheKey> {
        self.entry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|e| e.key.clone())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}
