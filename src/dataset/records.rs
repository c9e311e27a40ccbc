//! Typed enrollment records
//!
//! Resolves the required columns of a loaded `Table` and turns every
//! non-blank row into an `EnrollmentRecord`. A `Dataset` pairs the raw table
//! with its records so views can fall back to the original cells.
//!
//! Every row needs a valid school year. Senior High School rows feed the
//! congestion arithmetic, so their region, sector and counts are validated
//! strictly. Other rows are kept with whatever their cells hold.

use serde::Serialize;

use crate::dataset::error::{DatasetError, DatasetResult};
use crate::dataset::types::{Cell, SchoolYear, Table};
use crate::prepare::SENIOR_HIGH_SCHOOL;

pub const COL_SCHOOL_YEAR: &str = "School Year";
pub const COL_REGION: &str = "Region";
pub const COL_LEVEL: &str = "Level";
pub const COL_SECTOR: &str = "Sector";
pub const COL_TOTAL_ENROLLMENT: &str = "Total Enrollment";
pub const COL_TOTAL_INFRASTRUCTURE: &str = "Total Infrastructure";

/// Columns every dataset must carry
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_SCHOOL_YEAR,
    COL_REGION,
    COL_LEVEL,
    COL_SECTOR,
    COL_TOTAL_ENROLLMENT,
    COL_TOTAL_INFRASTRUCTURE,
];

/// One row of the enrollment dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentRecord {
    /// Zero-based row position in the source table
    pub row: usize,
    pub school_year: SchoolYear,
    pub region: String,
    pub level: String,
    pub sector: String,
    /// Zero when a non-SHS row has no usable count
    pub total_enrollment: u64,
    /// `None` when the cell is blank
    pub total_infrastructure: Option<u64>,
}

/// Positions of the required columns in a table
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    school_year: usize,
    region: usize,
    level: usize,
    sector: usize,
    total_enrollment: usize,
    total_infrastructure: usize,
}

impl ColumnMap {
    fn resolve(table: &Table) -> DatasetResult<Self> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            school_year: find(COL_SCHOOL_YEAR)?,
            region: find(COL_REGION)?,
            level: find(COL_LEVEL)?,
            sector: find(COL_SECTOR)?,
            total_enrollment: find(COL_TOTAL_ENROLLMENT)?,
            total_infrastructure: find(COL_TOTAL_INFRASTRUCTURE)?,
        })
    }
}

/// A loaded table together with its validated records
#[derive(Debug, Clone)]
pub struct Dataset {
    table: Table,
    records: Vec<EnrollmentRecord>,
}

impl Dataset {
    /// Build a record from every row of `table` that has any value
    ///
    /// Fully blank rows are skipped. Errors report the spreadsheet row number
    /// (header is row 1).
    pub fn from_table(table: Table) -> DatasetResult<Self> {
        let columns = ColumnMap::resolve(&table)?;

        let records = table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.iter().all(Cell::is_empty))
            .map(|(idx, row)| parse_record(idx, row, &columns))
            .collect::<DatasetResult<Vec<_>>>()?;

        Ok(Self { table, records })
    }

    /// The raw table, headers trimmed
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn records(&self) -> &[EnrollmentRecord] {
        &self.records
    }

    /// Original cells backing a record
    pub fn cells(&self, record: &EnrollmentRecord) -> &[Cell] {
        &self.table.rows()[record.row]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn sheet_row(idx: usize) -> usize {
    idx + 2
}

fn invalid(idx: usize, column: &str, cell: &Cell) -> DatasetError {
    DatasetError::InvalidValue {
        row: sheet_row(idx),
        column: column.to_string(),
        value: cell.to_string(),
    }
}

fn text_field(idx: usize, row: &[Cell], pos: usize, column: &str) -> DatasetResult<String> {
    row[pos].as_text().ok_or_else(|| invalid(idx, column, &row[pos]))
}

fn parse_record(idx: usize, row: &[Cell], columns: &ColumnMap) -> DatasetResult<EnrollmentRecord> {
    let year_cell = &row[columns.school_year];
    let school_year =
        SchoolYear::from_cell(year_cell).ok_or_else(|| DatasetError::InvalidSchoolYear {
            row: sheet_row(idx),
            value: year_cell.to_string(),
        })?;

    let level = row[columns.level].as_text().unwrap_or_default();
    if level != SENIOR_HIGH_SCHOOL {
        return Ok(EnrollmentRecord {
            row: idx,
            school_year,
            region: row[columns.region].as_text().unwrap_or_default(),
            level,
            sector: row[columns.sector].as_text().unwrap_or_default(),
            total_enrollment: row[columns.total_enrollment].as_count().unwrap_or(0),
            total_infrastructure: row[columns.total_infrastructure].as_count(),
        });
    }

    let enrollment_cell = &row[columns.total_enrollment];
    let total_enrollment = enrollment_cell
        .as_count()
        .ok_or_else(|| invalid(idx, COL_TOTAL_ENROLLMENT, enrollment_cell))?;

    let infra_cell = &row[columns.total_infrastructure];
    let total_infrastructure = if infra_cell.is_empty() {
        None
    } else {
        Some(
            infra_cell
                .as_count()
                .ok_or_else(|| invalid(idx, COL_TOTAL_INFRASTRUCTURE, infra_cell))?,
        )
    };

    Ok(EnrollmentRecord {
        row: idx,
        school_year,
        region: text_field(idx, row, columns.region, COL_REGION)?,
        level,
        sector: text_field(idx, row, columns.sector, COL_SECTOR)?,
        total_enrollment,
        total_infrastructure,
    })
}
