//! Selection parameters for the aggregations
//!
//! - `RegionFilter`: allow-list of regions with short display labels
//! - `SectorAllowList`: sectors kept in the public/private comparison
//! - `YearPair`: the two years compared side by side

use serde::{Deserialize, Serialize};

use crate::dataset::SchoolYear;

/// A focus region and its short display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusRegion {
    /// Region name exactly as it appears in the dataset
    pub name: String,
    /// Short label used on charts
    pub label: String,
}

impl FocusRegion {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Ordered mapping from canonical region name to display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionFilter {
    regions: Vec<FocusRegion>,
}

impl RegionFilter {
    /// Build a filter; later duplicates of a name are ignored
    pub fn new(regions: impl IntoIterator<Item = FocusRegion>) -> Self {
        let mut kept: Vec<FocusRegion> = Vec::new();
        for region in regions {
            if !kept.iter().any(|r| r.name == region.name) {
                kept.push(region);
            }
        }
        Self { regions: kept }
    }

    /// The high-growth regions singled out by the dashboard
    pub fn high_growth() -> Self {
        Self::new([
            FocusRegion::new("NCR - National Capital Region", "NCR"),
            FocusRegion::new("Region IV-A - CALABARZON", "CALABARZON"),
            FocusRegion::new("Region III - Central Luzon", "Central Luzon"),
            FocusRegion::new("Region XI - Davao Region", "Davao"),
            FocusRegion::new("Region X - Northern Mindanao", "Northern Mindanao"),
        ])
    }

    pub fn contains(&self, region: &str) -> bool {
        self.label(region).is_some()
    }

    /// Short label for a region, `None` when not allow-listed
    pub fn label(&self, region: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|r| r.name == region)
            .map(|r| r.label.as_str())
    }

    /// First configured region name carrying `label`
    pub fn name_for(&self, label: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.name.as_str())
    }

    pub fn regions(&self) -> &[FocusRegion] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self::high_growth()
    }
}

impl From<Vec<FocusRegion>> for RegionFilter {
    fn from(regions: Vec<FocusRegion>) -> Self {
        Self::new(regions)
    }
}

/// Sectors kept in the sector comparison, matched exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorAllowList {
    sectors: Vec<String>,
}

impl SectorAllowList {
    pub fn new(sectors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            sectors: sectors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, sector: &str) -> bool {
        self.sectors.iter().any(|s| s == sector)
    }

    /// Position of a sector in the list, used for ordering
    pub fn position(&self, sector: &str) -> Option<usize> {
        self.sectors.iter().position(|s| s == sector)
    }

    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }
}

impl Default for SectorAllowList {
    fn default() -> Self {
        Self::new(["PUBLIC", "PRIVATE"])
    }
}

/// Two years compared side by side, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearPair {
    pub first: SchoolYear,
    pub second: SchoolYear,
}

impl YearPair {
    pub fn new(first: SchoolYear, second: SchoolYear) -> Self {
        Self { first, second }
    }

    pub fn contains(&self, year: &SchoolYear) -> bool {
        self.first == *year || self.second == *year
    }

    /// Facet position of a year: 0 for the first, 1 for the second
    pub fn position(&self, year: &SchoolYear) -> Option<usize> {
        if self.first == *year {
            Some(0)
        } else if self.second == *year {
            Some(1)
        } else {
            None
        }
    }

    /// Years in facet order, without repeats
    pub fn years(&self) -> Vec<SchoolYear> {
        if self.first == self.second {
            vec![self.first]
        } else {
            vec![self.first, self.second]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_filter_labels() {
        let filter = RegionFilter::high_growth();
        assert_eq!(filter.regions().len(), 5);
        assert_eq!(filter.label("Region XI - Davao Region"), Some("Davao"));
        assert!(filter.contains("NCR - National Capital Region"));
        assert!(!filter.contains("NCR"));
        assert!(!filter.contains("Region VII - Central Visayas"));
    }

    #[test]
    fn test_region_filter_keeps_first_duplicate() {
        let filter = RegionFilter::new([
            FocusRegion::new("A", "first"),
            FocusRegion::new("A", "second"),
        ]);
        assert_eq!(filter.regions().len(), 1);
        assert_eq!(filter.label("A"), Some("first"));
    }

    #[test]
    fn test_name_for_shared_label() {
        let filter = RegionFilter::new([
            FocusRegion::new("NCR - National Capital Region", "NCR"),
            FocusRegion::new("National Capital Region", "NCR"),
        ]);
        assert_eq!(filter.name_for("NCR"), Some("NCR - National Capital Region"));
        assert_eq!(filter.name_for("Davao"), None);
    }

    #[test]
    fn test_sector_allow_list_is_exact() {
        let sectors = SectorAllowList::default();
        assert!(sectors.contains("PUBLIC"));
        assert!(!sectors.contains("Public"));
        assert!(!sectors.contains("SUCs/LUCs"));
        assert_eq!(sectors.position("PRIVATE"), Some(1));
    }

    #[test]
    fn test_year_pair() {
        let a = SchoolYear::new(2019);
        let b = SchoolYear::new(2023);
        let pair = YearPair::new(b, a);

        assert_eq!(pair.position(&b), Some(0));
        assert_eq!(pair.position(&a), Some(1));
        assert!(!pair.contains(&SchoolYear::new(2020)));
        assert_eq!(pair.years(), vec![b, a]);
        assert_eq!(YearPair::new(a, a).years(), vec![a]);
    }
}
