//! Senior High School congestion table
//!
//! Restricts the dataset to SHS rows with a usable infrastructure count and
//! derives learners per facility for each of them.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::dataset::{Cell, Dataset, EnrollmentRecord, SchoolYear, Table};

/// Level value selecting Senior High School rows
pub const SENIOR_HIGH_SCHOOL: &str = "Senior High School";

/// Name of the derived ratio column
pub const COL_LEARNERS_PER_INFRA: &str = "Learners per Infra";

/// An SHS record with its derived congestion ratio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CongestionRecord {
    pub record: EnrollmentRecord,
    /// Infrastructure count, always present and non-zero
    pub total_infrastructure: u64,
    pub learners_per_infra: f64,
    /// Original cells of the source row
    pub cells: Vec<Cell>,
}

/// All original columns plus `Learners per Infra`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CongestionTable {
    columns: Vec<String>,
    rows: Vec<CongestionRecord>,
}

impl CongestionTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[CongestionRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Flatten back into a plain table with the ratio as the last column
    pub fn to_table(&self) -> Table {
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut cells = r.cells.clone();
                cells.push(Cell::Float(r.learners_per_infra));
                cells
            })
            .collect();

        Table::from_checked(self.columns.clone(), rows)
    }
}

/// Build the SHS congestion table
///
/// Keeps rows whose Level is exactly "Senior High School" and whose Total
/// Infrastructure is present and non-zero. The input is not modified.
pub fn compute_congestion(dataset: &Dataset) -> CongestionTable {
    // A stale ratio column in the source is replaced by the derived one
    let replaces_ratio = dataset.table().column_index(COL_LEARNERS_PER_INFRA);
    let mut columns = dataset.table().columns().to_vec();
    if let Some(pos) = replaces_ratio {
        columns.remove(pos);
    }
    columns.push(COL_LEARNERS_PER_INFRA.to_string());

    let mut zero_infra = 0usize;
    let rows: Vec<CongestionRecord> = dataset
        .records()
        .iter()
        .filter(|r| r.level == SENIOR_HIGH_SCHOOL)
        .filter_map(|r| {
            let infra = r.total_infrastructure?;
            if infra == 0 {
                zero_infra += 1;
                return None;
            }
            let mut cells = dataset.cells(r).to_vec();
            if let Some(pos) = replaces_ratio {
                cells.remove(pos);
            }
            Some(CongestionRecord {
                record: r.clone(),
                total_infrastructure: infra,
                learners_per_infra: r.total_enrollment as f64 / infra as f64,
                cells,
            })
        })
        .collect();

    if zero_infra > 0 {
        tracing::debug!(rows = zero_infra, "Excluded SHS rows with zero infrastructure");
    }

    CongestionTable { columns, rows }
}

/// Distinct school years of the dataset in chronological order
pub fn ordered_years(dataset: &Dataset) -> Vec<SchoolYear> {
    dataset
        .records()
        .iter()
        .map(|r| r.school_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::test_support::{dataset, shs_row, Row};

    #[test]
    fn test_two_year_ncr_scenario() {
        let data = dataset(vec![
            shs_row("2021", "NCR", "PUBLIC", 1000, Some(10)),
            shs_row("2022", "NCR", "PUBLIC", 1200, Some(10)),
        ]);

        let table = compute_congestion(&data);
        let ratios: Vec<f64> = table.rows().iter().map(|r| r.learners_per_infra).collect();
        assert_eq!(ratios, vec![100.0, 120.0]);
    }

    #[test]
    fn test_only_shs_rows_with_infrastructure() {
        let data = dataset(vec![
            shs_row("2021", "NCR", "PUBLIC", 1000, Some(10)),
            Row {
                level: "Junior High School",
                ..shs_row("2021", "NCR", "PUBLIC", 5000, Some(1))
            },
            shs_row("2021", "NCR", "PRIVATE", 300, None),
            Row {
                level: "senior high school",
                ..shs_row("2021", "NCR", "PUBLIC", 10, Some(1))
            },
        ]);

        let table = compute_congestion(&data);
        assert_eq!(table.len(), 1);
        assert!(table.len() <= data.len());
        for row in table.rows() {
            assert_eq!(row.record.level, SENIOR_HIGH_SCHOOL);
            assert!(row.record.total_infrastructure.is_some());
        }
    }

    #[test]
    fn test_zero_infrastructure_excluded() {
        let data = dataset(vec![
            shs_row("2021", "NCR", "PUBLIC", 1000, Some(0)),
            shs_row("2021", "NCR", "PUBLIC", 500, Some(5)),
        ]);

        let table = compute_congestion(&data);
        assert_eq!(table.len(), 1);
        assert!(table.rows()[0].learners_per_infra.is_finite());
    }

    #[test]
    fn test_ratio_matches_source_columns() {
        let data = dataset(vec![
            shs_row("2021", "NCR", "PUBLIC", 1001, Some(7)),
            shs_row("2022", "NCR", "PRIVATE", 33, Some(4)),
        ]);

        for row in compute_congestion(&data).rows() {
            let expected = row.record.total_enrollment as f64 / row.total_infrastructure as f64;
            assert!((row.learners_per_infra - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_table_keeps_original_columns() {
        let data = dataset(vec![shs_row("2021", "NCR", "PUBLIC", 1000, Some(10))]);

        let table = compute_congestion(&data).to_table();
        let mut expected = data.table().columns().to_vec();
        expected.push(COL_LEARNERS_PER_INFRA.to_string());

        assert_eq!(table.columns(), expected.as_slice());
        assert_eq!(table.get(0, expected.len() - 1), Some(&Cell::Float(100.0)));
        // Source dataset untouched
        assert_eq!(data.table().width(), expected.len() - 1);
    }

    #[test]
    fn test_ordered_years_distinct_and_sorted() {
        let data = dataset(vec![
            shs_row("2022-2023", "NCR", "PUBLIC", 1, Some(1)),
            shs_row("2020-21", "NCR", "PUBLIC", 1, Some(1)),
            shs_row("2022-23", "NCR", "PRIVATE", 1, Some(1)),
            shs_row("2021-2022", "NCR", "PUBLIC", 1, None),
        ]);

        let years = ordered_years(&data);
        let labels: Vec<String> = years.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["2020-2021", "2021-2022", "2022-2023"]);

        // Idempotent
        assert_eq!(ordered_years(&data), years);
    }

    #[test]
    fn test_ordered_years_empty_dataset() {
        assert!(ordered_years(&dataset(vec![])).is_empty());
    }
}
