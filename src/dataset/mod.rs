//! Enrollview Dataset Layer
//!
//! Loading and validation of enrollment spreadsheets:
//!
//! - **types**: Cell, Table and SchoolYear
//! - **loader**: Spreadsheet / CSV parsing into a `Table`
//! - **records**: Typed `EnrollmentRecord`s over a loaded table
//! - **cache**: Injectable single-entry cache keyed by load parameters
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use enrollview::dataset::{DatasetCache, DatasetSource};
//!
//! let cache = DatasetCache::new();
//! let dataset = cache
//!     .load(&DatasetSource::path("Education Dataset (1).xlsx"))
//!     .expect("dataset loads");
//! println!("{} records", dataset.len());
//! ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod records;
pub mod types;

pub use cache::{CacheKey, CacheStats, DatasetCache, SourceReader, SpreadsheetReader};
pub use error::{DatasetError, DatasetResult, LoadError, LOAD_FAILURE_MESSAGE};
pub use loader::{load_dataset, load_table, DatasetSource, LoadOptions};
pub use records::{
    Dataset, EnrollmentRecord, COL_LEVEL, COL_REGION, COL_SCHOOL_YEAR, COL_SECTOR,
    COL_TOTAL_ENROLLMENT, COL_TOTAL_INFRASTRUCTURE, REQUIRED_COLUMNS,
};
pub use types::{Cell, SchoolYear, Table};
