//! Core data types for loaded datasets
//!
//! - `Cell`: a single spreadsheet value
//! - `Table`: headers plus rows, as read from the file
//! - `SchoolYear`: canonical, chronologically sortable year label

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::dataset::error::LoadError;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    /// Infer a cell from raw text (CSV input)
    pub fn infer(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Cell::Empty;
        }
        if let Ok(i) = raw.trim().parse::<i64>() {
            return Cell::Int(i);
        }
        if let Ok(f) = raw.trim().parse::<f64>() {
            return Cell::Float(f);
        }
        Cell::Text(raw.to_string())
    }

    /// Check if the cell carries no value
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Float(f) => f.is_nan(),
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as text, `None` when empty
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(self.to_string())
    }

    /// Read the cell as a non-negative whole count
    ///
    /// Accepts integers, integral floats and numeric text with thousands
    /// separators.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Cell::Int(i) => u64::try_from(*i).ok(),
            Cell::Float(f) if f.is_finite() && *f >= 0.0 && f.fract() == 0.0 => Some(*f as u64),
            Cell::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                cleaned
                    .parse::<u64>()
                    .ok()
                    .or_else(|| Cell::Float(cleaned.parse().ok()?).as_count())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{}", *v as i64),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Tabular data as read from a spreadsheet sheet
///
/// Headers are trimmed on construction and must be unique afterwards.
/// Every row is padded or truncated to the header width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, trimming headers and rejecting duplicates
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, LoadError> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(headers.len());

        for (idx, header) in headers.iter().enumerate() {
            let trimmed = header.trim();
            let name = if trimmed.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                trimmed.to_string()
            };
            if !seen.insert(name.clone()) {
                return Err(LoadError::DuplicateColumn(name));
            }
            columns.push(name);
        }

        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Build from columns already known to be trimmed and unique
    pub(crate) fn from_checked(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Column names in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column, exact match
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get a single cell
    pub fn get(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:S\.?Y\.?\s*)?(\d{4})\s*(?:[-\x{2013}/]\s*(\d{4}|\d{2}))?\s*$")
            .expect("school year pattern is valid")
    })
}

/// A school year, ordered chronologically
///
/// Parsed from labels like `2021`, `2021-2022`, `2021-22`, `SY 2021-2022`
/// and displayed canonically as `2021-2022`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolYear {
    start: u16,
    end: Option<u16>,
}

impl SchoolYear {
    /// Single-year label
    pub fn new(start: u16) -> Self {
        Self { start, end: None }
    }

    /// Span label such as 2021-2022
    pub fn span(start: u16, end: u16) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> Option<u16> {
        self.end
    }

    /// Read a school year from a cell
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Int(i) => u16::try_from(*i).ok().filter(|y| *y >= 1000).map(Self::new),
            Cell::Float(f) if f.fract() == 0.0 => Self::from_cell(&Cell::Int(*f as i64)),
            Cell::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl FromStr for SchoolYear {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = year_pattern()
            .captures(s)
            .ok_or_else(|| format!("Not a school year: {}", s))?;

        let start: u16 = caps[1]
            .parse()
            .map_err(|_| format!("Not a school year: {}", s))?;

        let end = match caps.get(2) {
            None => None,
            Some(m) if m.as_str().len() == 2 => {
                let yy: u16 = m.as_str().parse().map_err(|_| format!("Not a school year: {}", s))?;
                let mut end = start / 100 * 100 + yy;
                if end < start {
                    end += 100;
                }
                Some(end)
            }
            Some(m) => Some(
                m.as_str()
                    .parse()
                    .map_err(|_| format!("Not a school year: {}", s))?,
            ),
        };

        if let Some(end) = end {
            if end < start {
                return Err(format!("School year ends before it starts: {}", s));
            }
        }

        Ok(Self { start, end })
    }
}

impl fmt::Display for SchoolYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}", self.start),
        }
    }
}

impl TryFrom<String> for SchoolYear {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchoolYear> for String {
    fn from(year: SchoolYear) -> Self {
        year.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_trimmed() {
        let table = Table::new(
            vec!["  School Year".into(), "Region  ".into(), " Level ".into()],
            vec![vec![Cell::Int(2021)]],
        )
        .unwrap();

        assert_eq!(table.columns(), &["School Year", "Region", "Level"]);
        assert_eq!(table.column_index("Region"), Some(1));
        assert_eq!(table.column_index("region"), None);
        // Short rows are padded to the header width
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.get(0, 2), Some(&Cell::Empty));
    }

    #[test]
    fn test_duplicate_after_trim_rejected() {
        let err = Table::new(vec!["Region".into(), " Region ".into()], vec![]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateColumn(name) if name == "Region"));
    }

    #[test]
    fn test_blank_headers_get_positional_names() {
        let table = Table::new(vec!["A".into(), " ".into(), "".into()], vec![]).unwrap();
        assert_eq!(table.columns(), &["A", "Unnamed: 1", "Unnamed: 2"]);
    }

    #[test]
    fn test_cell_counts() {
        assert_eq!(Cell::Int(42).as_count(), Some(42));
        assert_eq!(Cell::Float(1200.0).as_count(), Some(1200));
        assert_eq!(Cell::Text(" 1,234 ".into()).as_count(), Some(1234));
        assert_eq!(Cell::Int(-3).as_count(), None);
        assert_eq!(Cell::Float(2.5).as_count(), None);
        assert_eq!(Cell::Text("n/a".into()).as_count(), None);
        assert_eq!(Cell::Empty.as_count(), None);
    }

    #[test]
    fn test_cell_infer_and_display() {
        assert_eq!(Cell::infer(""), Cell::Empty);
        assert_eq!(Cell::infer("12"), Cell::Int(12));
        assert_eq!(Cell::infer("1.5"), Cell::Float(1.5));
        assert_eq!(Cell::infer("NCR"), Cell::Text("NCR".into()));
        assert_eq!(Cell::Float(2021.0).to_string(), "2021");
        assert!(Cell::Float(f64::NAN).is_empty());
    }

    #[test]
    fn test_school_year_parsing() {
        assert_eq!("2021".parse::<SchoolYear>().unwrap(), SchoolYear::new(2021));
        assert_eq!(
            "2021-2022".parse::<SchoolYear>().unwrap(),
            SchoolYear::span(2021, 2022)
        );
        assert_eq!(
            "SY 2021-22".parse::<SchoolYear>().unwrap(),
            SchoolYear::span(2021, 2022)
        );
        assert_eq!(
            "1999/00".parse::<SchoolYear>().unwrap(),
            SchoolYear::span(1999, 2000)
        );
        assert!("next year".parse::<SchoolYear>().is_err());
        assert!("2022-2021".parse::<SchoolYear>().is_err());
    }

    #[test]
    fn test_school_year_ordering_is_chronological() {
        let mut years: Vec<SchoolYear> = ["2019-20", "SY 2017-2018", "2018-2019"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        years.sort();

        let labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();
        assert_eq!(labels, vec!["2017-2018", "2018-2019", "2019-2020"]);
    }

    #[test]
    fn test_school_year_from_cell() {
        assert_eq!(
            SchoolYear::from_cell(&Cell::Float(2020.0)),
            Some(SchoolYear::new(2020))
        );
        assert_eq!(SchoolYear::from_cell(&Cell::Int(12)), None);
        assert_eq!(SchoolYear::from_cell(&Cell::Empty), None);
    }

    #[test]
    fn test_school_year_serde() {
        let year = SchoolYear::span(2021, 2022);
        let json = serde_json::to_string(&year).unwrap();
        assert_eq!(json, "\"2021-2022\"");

        let back: SchoolYear = serde_json::from_str("\"2021-22\"").unwrap();
        assert_eq!(back, year);
    }
}
