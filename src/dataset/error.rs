//! Dataset error types
//!
//! Defines the errors that can occur while loading a spreadsheet and turning
//! it into typed enrollment records.

use std::path::PathBuf;
use thiserror::Error;

/// User-facing message shown for any failed load
pub const LOAD_FAILURE_MESSAGE: &str =
    "Error loading dataset. Check file name/path or upload the file.";

/// Errors raised while reading a spreadsheet into a table
#[derive(Error, Debug)]
pub enum LoadError {
    /// File could not be read
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension is not one we know how to parse
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Workbook parsing failed
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// CSV parsing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook has no sheet or the sheet has no header row
    #[error("Sheet is empty: {0}")]
    EmptySheet(String),

    /// Two headers are identical once whitespace is trimmed
    #[error("Duplicate column after trimming headers: {0:?}")]
    DuplicateColumn(String),
}

/// Errors raised while building typed records from a loaded table
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Loading the underlying table failed
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// A required column is absent (exact, case-sensitive match)
    #[error("Missing column: {0:?}")]
    MissingColumn(String),

    /// A cell holds a value the column cannot accept
    #[error("Invalid value {value:?} in column {column:?} at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// A School Year label has no recognizable year
    #[error("Invalid school year {value:?} at row {row}")]
    InvalidSchoolYear { row: usize, value: String },
}

impl DatasetError {
    /// Message to show to end users; details go to the log
    pub fn user_message(&self) -> &'static str {
        LOAD_FAILURE_MESSAGE
    }
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatasetError::MissingColumn("Region".to_string());
        assert_eq!(err.to_string(), "Missing column: \"Region\"");

        let err = LoadError::UnsupportedFormat("pdf".to_string());
        assert_eq!(err.to_string(), "Unsupported file format: pdf");
    }

    #[test]
    fn test_load_error_conversion() {
        let load = LoadError::EmptySheet("Sheet1".to_string());
        let err: DatasetError = load.into();
        assert!(matches!(err, DatasetError::Load(LoadError::EmptySheet(_))));
        assert_eq!(err.user_message(), LOAD_FAILURE_MESSAGE);
    }
}
