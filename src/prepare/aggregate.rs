//! Aggregations over the congestion table
//!
//! Each function is a pure transform from a `CongestionTable` plus explicit
//! selection parameters to the rows of one dashboard view. Groups with no
//! matching rows are absent from the output, never zero-filled.
//!
//! Row structs serialize with the dataset's column names so a charting layer
//! can plot them directly.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::dataset::SchoolYear;
use crate::prepare::congestion::CongestionTable;
use crate::prepare::filters::{RegionFilter, SectorAllowList, YearPair};

/// Running mean
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// National SHS totals for one school year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTotals {
    #[serde(rename = "School Year")]
    pub school_year: SchoolYear,
    pub total_enrollment: u64,
    pub total_infra: u64,
}

/// Mean congestion of one focus region in one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionYearRatio {
    #[serde(rename = "School Year")]
    pub school_year: SchoolYear,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Region Short")]
    pub region_short: String,
    #[serde(rename = "Learners per Infra")]
    pub learners_per_infra: f64,
}

/// Summed enrollment of one (region, year, sector) group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorEnrollment {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Region Short")]
    pub region_short: String,
    #[serde(rename = "School Year")]
    pub school_year: SchoolYear,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Total Enrollment")]
    pub total_enrollment: u64,
}

/// A region's position in the congestion ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRank {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Learners per Infra")]
    pub learners_per_infra: f64,
}

/// Sum enrollment and infrastructure per school year, in year order
pub fn aggregate_by_year(table: &CongestionTable) -> Vec<YearTotals> {
    let mut groups: BTreeMap<SchoolYear, (u64, u64)> = BTreeMap::new();

    for row in table.rows() {
        let totals = groups.entry(row.record.school_year).or_default();
        totals.0 += row.record.total_enrollment;
        totals.1 += row.total_infrastructure;
    }

    groups
        .into_iter()
        .map(|(school_year, (total_enrollment, total_infra))| YearTotals {
            school_year,
            total_enrollment,
            total_infra,
        })
        .collect()
}

/// Mean learners per facility per (year, focus region label)
///
/// Regions sharing a label form one group, reported under the first
/// configured name. Ordered by year, then short label.
pub fn aggregate_by_year_and_region(
    table: &CongestionTable,
    regions: &RegionFilter,
) -> Vec<RegionYearRatio> {
    let mut groups: BTreeMap<(SchoolYear, &str), Mean> = BTreeMap::new();

    for row in table.rows() {
        if let Some(label) = regions.label(&row.record.region) {
            groups
                .entry((row.record.school_year, label))
                .or_default()
                .push(row.learners_per_infra);
        }
    }

    groups
        .into_iter()
        .filter_map(|((school_year, label), mean)| {
            Some(RegionYearRatio {
                school_year,
                region: regions.name_for(label)?.to_string(),
                region_short: label.to_string(),
                learners_per_infra: mean.value(),
            })
        })
        .collect()
}

/// Summed enrollment per (focus region, year, sector) for two years
///
/// Ordered by region, then the year's position in the pair, then the
/// sector's position in the allow-list.
pub fn aggregate_sector_comparison(
    table: &CongestionTable,
    regions: &RegionFilter,
    years: &YearPair,
    sectors: &SectorAllowList,
) -> Vec<SectorEnrollment> {
    let mut groups: BTreeMap<(&str, usize, usize), (SchoolYear, &str, u64)> = BTreeMap::new();

    for row in table.rows() {
        let record = &row.record;
        if !regions.contains(&record.region) {
            continue;
        }
        let (Some(year_pos), Some(sector_pos)) = (
            years.position(&record.school_year),
            sectors.position(&record.sector),
        ) else {
            continue;
        };

        groups
            .entry((record.region.as_str(), year_pos, sector_pos))
            .or_insert((record.school_year, record.sector.as_str(), 0))
            .2 += record.total_enrollment;
    }

    groups
        .into_iter()
        .filter_map(|((region, _, _), (school_year, sector, total_enrollment))| {
            Some(SectorEnrollment {
                region: region.to_string(),
                region_short: regions.label(region)?.to_string(),
                school_year,
                sector: sector.to_string(),
                total_enrollment,
            })
        })
        .collect()
}

/// Regions ranked by mean learners per facility in `year`, highest first
///
/// Ties keep region names in ascending order. A year with no rows yields an
/// empty ranking.
pub fn rank_by_congestion(table: &CongestionTable, year: &SchoolYear) -> Vec<RegionRank> {
    let mut groups: BTreeMap<&str, Mean> = BTreeMap::new();

    for row in table.rows() {
        if row.record.school_year == *year {
            groups
                .entry(row.record.region.as_str())
                .or_default()
                .push(row.learners_per_infra);
        }
    }

    let mut ranking: Vec<RegionRank> = groups
        .into_iter()
        .map(|(region, mean)| RegionRank {
            region: region.to_string(),
            learners_per_infra: mean.value(),
        })
        .collect();

    // Stable sort keeps the name order from the BTreeMap for ties
    ranking.sort_by(|a, b| b.learners_per_infra.total_cmp(&a.learners_per_infra));
    ranking
}
