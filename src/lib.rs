//! # Enrollview
//!
//! Data service behind a regional education-enrollment dashboard. Loads an
//! enrollment spreadsheet and prepares the tables for each dashboard view.
//!
//! ## Features
//!
//! - **Spreadsheet loading**: xlsx, xls, ods and CSV with trimmed, validated headers
//! - **Canonical school years**: `2021-22`, `SY 2021-2022` and `2021-2022` are one year
//! - **Congestion analysis**: learners per facility for Senior High School rows
//! - **Dashboard views**: national totals, regional trends, sector comparison, ranking
//! - **HTTP API**: views, uploads and health probes over Axum
//!
//! ## Modules
//!
//! - [`dataset`]: Loading, typed records and the load cache
//! - [`prepare`]: Congestion table and aggregations
//! - [`views`]: Dashboard composition and chart descriptors
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use enrollview::dataset::{DatasetCache, DatasetSource};
//! use enrollview::prepare::{RegionFilter, SectorAllowList};
//! use enrollview::views::{Dashboard, ViewSelection};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = DatasetCache::new();
//!     let dataset = cache.load(&DatasetSource::path("Education Dataset (1).xlsx"))?;
//!
//!     let regions = RegionFilter::high_growth();
//!     let sectors = SectorAllowList::default();
//!     let dashboard = Dashboard::new(&dataset, &regions, &sectors);
//!
//!     let views = dashboard.build(&ViewSelection::default());
//!     for rank in &views.ranking.rows {
//!         println!("{}: {:.1}", rank.region, rank.learners_per_infra);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod prepare;
pub mod views;

// Re-export top-level types for convenience
pub use dataset::{
    load_dataset, Cell, Dataset, DatasetCache, DatasetError, DatasetResult, DatasetSource,
    EnrollmentRecord, LoadError, SchoolYear, Table,
};

pub use prepare::{
    aggregate_by_year, aggregate_by_year_and_region, aggregate_sector_comparison,
    compute_congestion, ordered_years, rank_by_congestion, CongestionRecord, CongestionTable,
    FocusRegion, RegionFilter, SectorAllowList, YearPair,
};

pub use views::{ChartSpec, Dashboard, DashboardViews, View, ViewSelection};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig};
