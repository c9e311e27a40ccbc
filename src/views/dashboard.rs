//! Dashboard composition
//!
//! Builds every view of the dashboard from one loaded dataset and an explicit
//! year selection. Unset selections fall back to the dashboard defaults:
//! the latest year for the ranking, earliest and latest for the comparison.

use serde::{Deserialize, Serialize};

use crate::dataset::{Cell, Dataset, SchoolYear, COL_REGION, COL_SCHOOL_YEAR};
use crate::prepare::{
    aggregate_by_year, aggregate_by_year_and_region, aggregate_sector_comparison,
    compute_congestion, ordered_years, rank_by_congestion, CongestionTable, FocusRegion,
    RegionFilter, RegionRank, RegionYearRatio, SectorAllowList, SectorEnrollment, YearPair,
    YearTotals, COL_LEARNERS_PER_INFRA,
};
use crate::views::chart::ChartSpec;
use crate::views::table::{TableRow, Tabular};

/// Years picked by the user; `None` means use the default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSelection {
    #[serde(default)]
    pub ranking_year: Option<SchoolYear>,
    #[serde(default)]
    pub year_a: Option<SchoolYear>,
    #[serde(default)]
    pub year_b: Option<SchoolYear>,
}

/// Selection after defaults are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedSelection {
    pub ranking_year: Option<SchoolYear>,
    pub compare: Option<YearPair>,
}

/// Prepared rows plus how to draw them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View<R> {
    pub chart: ChartSpec,
    pub caption: String,
    pub rows: Vec<R>,
}

impl<R: TableRow> Tabular for View<R> {
    fn headers(&self) -> Vec<String> {
        R::headers()
    }

    fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(TableRow::cells).collect()
    }
}

/// The SHS table with every original column
///
/// Text and CSV output lead with a `#` column numbering rows from zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawView {
    pub chart: ChartSpec,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Tabular for RawView {
    fn headers(&self) -> Vec<String> {
        std::iter::once("#".to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                std::iter::once(idx.to_string())
                    .chain(row.iter().map(ToString::to_string))
                    .collect()
            })
            .collect()
    }
}

/// Everything the dashboard page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub years: Vec<SchoolYear>,
    pub selection: ResolvedSelection,
    pub national: View<YearTotals>,
    pub regional: View<RegionYearRatio>,
    pub sector: View<SectorEnrollment>,
    pub ranking: View<RegionRank>,
    pub raw: RawView,
}

/// Shape of the loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub source: String,
    pub rows: usize,
    pub shs_rows: usize,
    pub columns: Vec<String>,
    pub years: Vec<SchoolYear>,
    pub focus_regions: Vec<FocusRegion>,
}

/// View builder over one dataset
pub struct Dashboard<'a> {
    dataset: &'a Dataset,
    regions: &'a RegionFilter,
    sectors: &'a SectorAllowList,
    congestion: CongestionTable,
    years: Vec<SchoolYear>,
}

impl<'a> Dashboard<'a> {
    pub fn new(dataset: &'a Dataset, regions: &'a RegionFilter, sectors: &'a SectorAllowList) -> Self {
        Self {
            dataset,
            regions,
            sectors,
            congestion: compute_congestion(dataset),
            years: ordered_years(dataset),
        }
    }

    /// Selectable years, earliest first
    pub fn years(&self) -> &[SchoolYear] {
        &self.years
    }

    pub fn congestion(&self) -> &CongestionTable {
        &self.congestion
    }

    /// Fill unset selections with the defaults
    pub fn resolve(&self, selection: &ViewSelection) -> ResolvedSelection {
        let earliest = self.years.first().copied();
        let latest = self.years.last().copied();

        let compare = match (selection.year_a.or(earliest), selection.year_b.or(latest)) {
            (Some(a), Some(b)) => Some(YearPair::new(a, b)),
            _ => None,
        };

        ResolvedSelection {
            ranking_year: selection.ranking_year.or(latest),
            compare,
        }
    }

    pub fn summary(&self, source: impl Into<String>) -> DatasetSummary {
        DatasetSummary {
            source: source.into(),
            rows: self.dataset.len(),
            shs_rows: self.congestion.len(),
            columns: self.dataset.table().columns().to_vec(),
            years: self.years.clone(),
            focus_regions: self.regions.regions().to_vec(),
        }
    }

    /// National SHS enrollment against infrastructure
    pub fn national(&self) -> View<YearTotals> {
        let chart = ChartSpec::line(
            "National Senior High School Enrollment vs Infrastructure",
            COL_SCHOOL_YEAR,
            &["total_enrollment", "total_infra"],
        )
        .category_order(COL_SCHOOL_YEAR, self.year_labels())
        .axis_titles(COL_SCHOOL_YEAR, "Count")
        .legend("Metric");

        View {
            chart,
            caption: "This view shows how Senior High School enrollment has grown across school \
                      years compared to the slower change in reported infrastructure."
                .to_string(),
            rows: aggregate_by_year(&self.congestion),
        }
    }

    /// Congestion trends in the focus regions
    pub fn regional(&self) -> View<RegionYearRatio> {
        let chart = ChartSpec::line(
            "SHS Congestion Trends in Selected Regions",
            COL_SCHOOL_YEAR,
            &[COL_LEARNERS_PER_INFRA],
        )
        .color("Region Short")
        .category_order(COL_SCHOOL_YEAR, self.year_labels())
        .axis_titles(COL_SCHOOL_YEAR, "Learners per Facility")
        .legend(COL_REGION);

        View {
            chart,
            caption: format!(
                "These trends highlight how congestion has changed over time in {}.",
                self.region_list()
            ),
            rows: aggregate_by_year_and_region(&self.congestion, self.regions),
        }
    }

    /// Public and private enrollment in the focus regions for two years
    pub fn sector(&self, years: Option<YearPair>) -> View<SectorEnrollment> {
        let order: Vec<String> = years
            .map(|p| p.years().iter().map(ToString::to_string).collect())
            .unwrap_or_default();

        let chart = ChartSpec::grouped_bar(
            "Public and Private Senior High School Enrollment in Selected Regions",
            "Region Short",
            "Total Enrollment",
        )
        .color("Sector")
        .facet(COL_SCHOOL_YEAR, order)
        .axis_titles(COL_REGION, "Enrollment");

        let (caption, rows) = match years {
            Some(pair) => (
                format!(
                    "These grouped bars compare public and private Senior High School enrollment \
                     in key regions for {} and {}, highlighting shifts in sector reliance over time.",
                    pair.first, pair.second
                ),
                aggregate_sector_comparison(&self.congestion, self.regions, &pair, self.sectors),
            ),
            None => ("No school years available for comparison.".to_string(), Vec::new()),
        };

        View {
            chart,
            caption,
            rows,
        }
    }

    /// Regions ranked by congestion in one year
    pub fn ranking(&self, year: Option<SchoolYear>) -> View<RegionRank> {
        let label = year.map(|y| y.to_string()).unwrap_or_default();

        let chart = ChartSpec::horizontal_bar(
            format!(
                "Regions Ranked by SHS Congestion (Learners per Facility, {})",
                label
            ),
            COL_LEARNERS_PER_INFRA,
            COL_REGION,
        )
        .axis_titles("Learners per Facility", COL_REGION)
        .reversed_y();

        View {
            chart,
            caption: "Regions at the top of this ranking have the highest number of Senior High \
                      School learners per facility. They can be considered priority candidates \
                      for new buildings and specialised SHS rooms."
                .to_string(),
            rows: year
                .map(|y| rank_by_congestion(&self.congestion, &y))
                .unwrap_or_default(),
        }
    }

    /// The SHS rows with all original columns and the derived ratio
    pub fn raw(&self) -> RawView {
        let table = self.congestion.to_table();
        RawView {
            chart: ChartSpec::table("Raw Senior High School data"),
            columns: table.columns().to_vec(),
            rows: table.rows().to_vec(),
        }
    }

    /// Build every view for a selection
    pub fn build(&self, selection: &ViewSelection) -> DashboardViews {
        let resolved = self.resolve(selection);

        DashboardViews {
            years: self.years.clone(),
            selection: resolved,
            national: self.national(),
            regional: self.regional(),
            sector: self.sector(resolved.compare),
            ranking: self.ranking(resolved.ranking_year),
            raw: self.raw(),
        }
    }

    fn year_labels(&self) -> Vec<String> {
        self.years.iter().map(ToString::to_string).collect()
    }

    fn region_list(&self) -> String {
        let names: Vec<&str> = self
            .regions
            .regions()
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        match names.split_last() {
            None => "the selected regions".to_string(),
            Some((last, [])) => last.to_string(),
            Some((last, [only])) => format!("{} and {}", only, last),
            Some((last, rest)) => format!("{}, and {}", rest.join(", "), last),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::test_support::{dataset, shs_row, Row};

    const NCR: &str = "NCR - National Capital Region";
    const DAVAO: &str = "Region XI - Davao Region";

    fn sample() -> Dataset {
        dataset(vec![
            shs_row("2019-2020", NCR, "PUBLIC", 1000, Some(10)),
            shs_row("2020-2021", NCR, "PRIVATE", 600, Some(3)),
            shs_row("2021-2022", NCR, "PUBLIC", 1200, Some(10)),
            shs_row("2021-2022", DAVAO, "PUBLIC", 900, Some(3)),
            Row {
                level: "Elementary",
                ..shs_row("2022-2023", NCR, "PUBLIC", 5000, Some(50))
            },
        ])
    }

    #[test]
    fn test_defaults_follow_year_order() {
        let data = sample();
        let regions = RegionFilter::high_growth();
        let sectors = SectorAllowList::default();
        let dashboard = Dashboard::new(&data, &regions, &sectors);

        // Years come from every row, not only SHS rows
        assert_eq!(dashboard.years().len(), 4);

        let resolved = dashboard.resolve(&ViewSelection::default());
        assert_eq!(resolved.ranking_year, Some(SchoolYear::span(2022, 2023)));
        assert_eq!(
            resolved.compare,
            Some(YearPair::new(
                SchoolYear::span(2019, 2020),
                SchoolYear::span(2022, 2023)
            ))
        );
    }

    #[test]
    fn test_explicit_selection_wins() {
        let data = sample();
        let regions = RegionFilter::high_growth();
        let sectors = SectorAllowList::default();
        let dashboard = Dashboard::new(&data, &regions, &sectors);

        let selection = ViewSelection {
            ranking_year: Some(SchoolYear::span(2021, 2022)),
            year_a: Some(SchoolYear::span(2021, 2022)),
            year_b: Some(SchoolYear::span(2019, 2020)),
        };
        let views = dashboard.build(&selection);

        let ranked: Vec<&str> = views.ranking.rows.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(ranked, vec![DAVAO, NCR]);
        assert!(views.ranking.chart.title.ends_with("2021-2022)"));

        assert_eq!(
            views.sector.chart.category_orders[COL_SCHOOL_YEAR],
            vec!["2021-2022", "2019-2020"]
        );
        assert!(views.sector.caption.contains("for 2021-2022 and 2019-2020"));
        assert_eq!(views.sector.rows[0].school_year, SchoolYear::span(2021, 2022));
    }

    #[test]
    fn test_latest_year_without_shs_rows_ranks_empty() {
        let data = sample();
        let regions = RegionFilter::high_growth();
        let sectors = SectorAllowList::default();
        let views = Dashboard::new(&data, &regions, &sectors).build(&ViewSelection::default());

        assert!(views.ranking.rows.is_empty());
        assert_eq!(views.national.rows.len(), 3);
        assert_eq!(views.raw.rows.len(), 4);
        assert_eq!(views.raw.columns.last().unwrap(), COL_LEARNERS_PER_INFRA);
    }

    #[test]
    fn test_raw_rows_are_numbered_from_zero() {
        let data = sample();
        let regions = RegionFilter::high_growth();
        let sectors = SectorAllowList::default();
        let raw = Dashboard::new(&data, &regions, &sectors).raw();

        let headers = raw.headers();
        assert_eq!(headers[0], "#");
        assert_eq!(headers[1..], raw.columns[..]);

        let rows = raw.text_rows();
        let numbers: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(numbers, ["0", "1", "2", "3"]);
        assert_eq!(rows[0][1], raw.rows[0][0].to_string());
        assert_eq!(rows[0].len(), raw.columns.len() + 1);
    }

    #[test]
    fn test_empty_dataset_builds_empty_views() {
        let data = dataset(vec![]);
        let regions = RegionFilter::high_growth();
        let sectors = SectorAllowList::default();
        let views = Dashboard::new(&data, &regions, &sectors).build(&ViewSelection::default());

        assert_eq!(views.selection.ranking_year, None);
        assert_eq!(views.selection.compare, None);
        assert!(views.sector.rows.is_empty());
        assert!(views.ranking.rows.is_empty());
    }

    #[test]
    fn test_summary_lists_columns() {
        let data = sample();
        let regions = RegionFilter::high_growth();
        let sectors = SectorAllowList::default();
        let summary = Dashboard::new(&data, &regions, &sectors).summary("sample.xlsx");

        assert_eq!(summary.rows, 5);
        assert_eq!(summary.shs_rows, 4);
        assert_eq!(summary.columns[0], COL_SCHOOL_YEAR);
        assert_eq!(summary.focus_regions.len(), 5);
    }

    #[test]
    fn test_regional_caption_lists_labels() {
        let data = sample();
        let regions = RegionFilter::new([
            FocusRegion::new(NCR, "NCR"),
            FocusRegion::new(DAVAO, "Davao"),
        ]);
        let sectors = SectorAllowList::default();
        let view = Dashboard::new(&data, &regions, &sectors).regional();

        assert!(view.caption.ends_with("in NCR and Davao."));
        assert_eq!(view.rows.len(), 4);
    }
}
