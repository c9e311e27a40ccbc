//! Dataset loading
//!
//! Reads an uploaded file or a file on disk into a `Table`. Workbooks
//! (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) go through calamine, `.csv`
//! through the csv crate. The first row is the header row.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::dataset::error::{DatasetResult, LoadError};
use crate::dataset::records::Dataset;
use crate::dataset::types::{Cell, Table};

const WORKBOOK_EXTENSIONS: [&str; 6] = ["xlsx", "xlsm", "xlsb", "xls", "xla", "ods"];

/// Where a dataset comes from
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// File content uploaded by the user
    Upload { file_name: String, bytes: Arc<[u8]> },
    /// Fallback file on disk
    Path(PathBuf),
}

impl DatasetSource {
    pub fn upload(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        DatasetSource::Upload {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        DatasetSource::Path(path.into())
    }

    /// Lowercased file extension, if any
    pub fn extension(&self) -> Option<String> {
        let name = match self {
            DatasetSource::Upload { file_name, .. } => Path::new(file_name),
            DatasetSource::Path(path) => path.as_path(),
        };
        name.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, DatasetSource::Upload { .. })
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Upload { file_name, bytes } => {
                write!(f, "upload {} ({} bytes)", file_name, bytes.len())
            }
            DatasetSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Options for reading workbooks
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Sheet to read; the first sheet when `None`
    pub sheet: Option<String>,
}

/// Load a source into a table with trimmed, unique headers
pub fn load_table(source: &DatasetSource, options: &LoadOptions) -> Result<Table, LoadError> {
    let bytes: Arc<[u8]> = match source {
        DatasetSource::Upload { bytes, .. } => Arc::clone(bytes),
        DatasetSource::Path(path) => std::fs::read(path)
            .map_err(|e| LoadError::Io {
                path: path.clone(),
                source: e,
            })?
            .into(),
    };

    match source.extension().as_deref() {
        Some("csv") => read_csv(&bytes),
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => read_workbook(&bytes, options),
        None if source.is_upload() => read_workbook(&bytes, options),
        Some(ext) => Err(LoadError::UnsupportedFormat(ext.to_string())),
        None => Err(LoadError::UnsupportedFormat(source.to_string())),
    }
}

/// Load a source and validate it into a dataset
pub fn load_dataset(source: &DatasetSource, options: &LoadOptions) -> DatasetResult<Dataset> {
    let table = load_table(source, options)?;
    tracing::debug!(
        source = %source,
        rows = table.height(),
        columns = table.width(),
        "Table loaded"
    );
    Dataset::from_table(table)
}

fn read_workbook(bytes: &[u8], options: &LoadOptions) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let range = match &options.sheet {
        Some(name) => workbook.worksheet_range(name)?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoadError::EmptySheet("workbook has no sheets".to_string()))??,
    };

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| LoadError::EmptySheet("no header row".to_string()))?
        .iter()
        .map(|cell| convert_cell(cell).to_string())
        .collect();

    let body = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Table::new(headers, body)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

fn read_csv(bytes: &[u8]) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(LoadError::EmptySheet("no header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::infer).collect());
    }

    Table::new(headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::error::DatasetError;
    use crate::dataset::types::SchoolYear;
    use rust_xlsxwriter::Workbook;
    use std::io::Write;
    use tempfile::tempdir;

    const CSV: &str = " School Year ,Region,Level ,Sector,Total Enrollment,Total Infrastructure
2021,NCR - National Capital Region,Senior High School,PUBLIC,1000,10
2022,NCR - National Capital Region,Senior High School,PUBLIC,1200,10
2022,NCR - National Capital Region,Junior High School,PRIVATE,800,
";

    #[test]
    fn test_load_csv_upload() {
        let source = DatasetSource::upload("data.csv", CSV.as_bytes().to_vec());
        let table = load_table(&source, &LoadOptions::default()).unwrap();

        assert_eq!(table.columns()[0], "School Year");
        assert_eq!(table.columns()[2], "Level");
        assert_eq!(table.height(), 3);
        assert_eq!(table.get(0, 4), Some(&Cell::Int(1000)));
        assert_eq!(table.get(2, 5), Some(&Cell::Empty));
    }

    #[test]
    fn test_load_csv_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("enrollment.CSV");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let dataset = load_dataset(&DatasetSource::path(&path), &LoadOptions::default()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[2].total_infrastructure, None);
    }

    #[test]
    fn test_csv_blank_row_is_skipped() {
        let csv = "School Year,Region,Level,Sector,Total Enrollment,Total Infrastructure
2021,NCR - National Capital Region,Senior High School,PUBLIC,1000,10
,,,,,
2022,NCR - National Capital Region,Senior High School,PUBLIC,1200,10
2022,NCR - National Capital Region,Elementary,,500,
";
        let source = DatasetSource::upload("gaps.csv", csv.as_bytes().to_vec());
        let dataset = load_dataset(&source, &LoadOptions::default()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[1].school_year, SchoolYear::new(2022));
        assert_eq!(dataset.records()[2].sector, "");
    }

    /// Two sheets: a notes sheet first, the data on "Enrollment"
    fn enrollment_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();

        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(0, 0, "Source").unwrap();
        notes.write_string(1, 0, "Enrollment by region").unwrap();

        let sheet = workbook.add_worksheet();
        sheet.set_name("Enrollment").unwrap();
        let headers = [
            " School Year ",
            "Region",
            "Level ",
            "Sector",
            "Total Enrollment",
            "Total Infrastructure",
        ];
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }

        sheet.write_number(1, 0, 2021.0).unwrap();
        sheet.write_string(1, 1, "NCR - National Capital Region").unwrap();
        sheet.write_string(1, 2, "Senior High School").unwrap();
        sheet.write_string(1, 3, "PUBLIC").unwrap();
        sheet.write_number(1, 4, 1500.0).unwrap();
        sheet.write_number(1, 5, 12.0).unwrap();

        // Row 3 is left blank
        sheet.write_string(3, 0, "2022-2023").unwrap();
        sheet.write_string(3, 1, "Region XI - Davao Region").unwrap();
        sheet.write_string(3, 2, "Senior High School").unwrap();
        sheet.write_string(3, 3, "PRIVATE").unwrap();
        sheet.write_number(3, 4, 1800.0).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    fn enrollment_sheet() -> LoadOptions {
        LoadOptions {
            sheet: Some("Enrollment".to_string()),
        }
    }

    #[test]
    fn test_load_workbook_named_sheet() {
        let source = DatasetSource::upload("data.xlsx", enrollment_workbook());
        let table = load_table(&source, &enrollment_sheet()).unwrap();

        assert_eq!(table.columns()[0], "School Year");
        assert_eq!(table.columns()[2], "Level");
        assert_eq!(table.height(), 3);
        assert_eq!(table.get(0, 0), Some(&Cell::Float(2021.0)));
        assert_eq!(table.get(0, 4), Some(&Cell::Float(1500.0)));
        assert!(table.rows()[1].iter().all(Cell::is_empty));
        assert_eq!(table.get(2, 5), Some(&Cell::Empty));
    }

    #[test]
    fn test_workbook_records() {
        let source = DatasetSource::upload("data.xlsx", enrollment_workbook());
        let dataset = load_dataset(&source, &enrollment_sheet()).unwrap();

        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.school_year, SchoolYear::new(2021));
        assert_eq!(first.total_enrollment, 1500);
        assert_eq!(first.total_infrastructure, Some(12));

        let second = &dataset.records()[1];
        assert_eq!(second.school_year, SchoolYear::span(2022, 2023));
        assert_eq!(second.region, "Region XI - Davao Region");
        assert_eq!(second.total_enrollment, 1800);
        assert_eq!(second.total_infrastructure, None);
    }

    #[test]
    fn test_workbook_defaults_to_first_sheet() {
        let source = DatasetSource::upload("data.xlsx", enrollment_workbook());

        let table = load_table(&source, &LoadOptions::default()).unwrap();
        assert_eq!(table.columns(), ["Source"]);

        let err = load_dataset(&source, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == "School Year"));
    }

    #[test]
    fn test_workbook_unknown_sheet() {
        let source = DatasetSource::upload("data.xlsx", enrollment_workbook());
        let options = LoadOptions {
            sheet: Some("Summary".to_string()),
        };
        let err = load_table(&source, &options).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet(_)));
    }

    #[test]
    fn test_missing_path_is_load_error() {
        let source = DatasetSource::path("/nonexistent/Education Dataset.xlsx");
        let err = load_dataset(&source, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, DatasetError::Load(LoadError::Io { .. })));
    }

    #[test]
    fn test_corrupt_workbook_is_load_error() {
        let source = DatasetSource::upload("broken.xlsx", b"not a workbook".to_vec());
        let err = load_table(&source, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let source = DatasetSource::upload("notes.pdf", b"%PDF".to_vec());
        let err = load_table(&source, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "pdf"));
    }

    #[test]
    fn test_duplicate_headers_after_trim() {
        let csv = "Region, Region\nNCR,NCR\n";
        let source = DatasetSource::upload("dup.csv", csv.as_bytes().to_vec());
        let err = load_table(&source, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateColumn(_)));
    }

    #[test]
    fn test_source_display() {
        let source = DatasetSource::upload("a.xlsx", vec![0u8; 4]);
        assert_eq!(source.to_string(), "upload a.xlsx (4 bytes)");
        assert_eq!(source.extension().as_deref(), Some("xlsx"));
    }
}
