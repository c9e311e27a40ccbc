//! Enrollview Data Preparation
//!
//! Pure transforms from a loaded `Dataset` to the tables behind each view:
//!
//! - **congestion**: SHS restriction, `Learners per Infra`, ordered years
//! - **aggregate**: national totals, regional trends, sector comparison, ranking
//! - **filters**: region allow-list, sector allow-list, year pair
//!
//! # Pipeline
//!
//! ```text
//! Dataset → compute_congestion → CongestionTable ─┬→ aggregate_by_year
//!                                                 ├→ aggregate_by_year_and_region
//!                                                 ├→ aggregate_sector_comparison
//!                                                 └→ rank_by_congestion
//! ```
//!
//! Selected years are always passed in; nothing here holds state.

pub mod aggregate;
pub mod congestion;
pub mod filters;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{
    aggregate_by_year, aggregate_by_year_and_region, aggregate_sector_comparison,
    rank_by_congestion, RegionRank, RegionYearRatio, SectorEnrollment, YearTotals,
};
pub use congestion::{
    compute_congestion, ordered_years, CongestionRecord, CongestionTable, COL_LEARNERS_PER_INFRA,
    SENIOR_HIGH_SCHOOL,
};
pub use filters::{FocusRegion, RegionFilter, SectorAllowList, YearPair};
