//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::SchoolYear;
use crate::views::DatasetSummary;

// ============================================
// DATASET DTOs
// ============================================

/// Upload query parameters
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Original file name; its extension selects the parser
    pub file_name: String,
}

/// Active dataset description
#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    /// True when an uploaded file replaces the default path
    pub uploaded: bool,
    #[serde(flatten)]
    pub summary: DatasetSummary,
}

/// Ordered school years
#[derive(Debug, Serialize)]
pub struct YearsResponse {
    pub years: Vec<SchoolYear>,
    pub earliest: Option<SchoolYear>,
    pub latest: Option<SchoolYear>,
}

impl YearsResponse {
    pub fn new(years: Vec<SchoolYear>) -> Self {
        Self {
            earliest: years.first().copied(),
            latest: years.last().copied(),
            years,
        }
    }
}

// ============================================
// VIEW DTOs
// ============================================

/// Sector comparison parameters
#[derive(Debug, Default, Deserialize)]
pub struct SectorParams {
    #[serde(default)]
    pub year_a: Option<SchoolYear>,
    #[serde(default)]
    pub year_b: Option<SchoolYear>,
}

/// Ranking parameters
#[derive(Debug, Default, Deserialize)]
pub struct RankingParams {
    #[serde(default)]
    pub year: Option<SchoolYear>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// Dataset status: "ok" or "unavailable"
    pub dataset: String,
    /// Active dataset source
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub version: String,
}
