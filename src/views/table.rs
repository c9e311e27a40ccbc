//! Plain-text access to view rows
//!
//! Used by the CLI to print views as aligned tables or CSV.

use crate::dataset::COL_REGION;
use crate::prepare::{
    RegionRank, RegionYearRatio, SectorEnrollment, YearTotals, COL_LEARNERS_PER_INFRA,
};

/// A row type with a fixed set of columns
pub trait TableRow {
    fn headers() -> Vec<String>;
    fn cells(&self) -> Vec<String>;
}

/// Anything that can be printed as a table
pub trait Tabular {
    fn headers(&self) -> Vec<String>;
    fn text_rows(&self) -> Vec<Vec<String>>;
}

fn ratio(value: f64) -> String {
    format!("{:.2}", value)
}

impl TableRow for YearTotals {
    fn headers() -> Vec<String> {
        vec![
            "School Year".to_string(),
            "total_enrollment".to_string(),
            "total_infra".to_string(),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.school_year.to_string(),
            self.total_enrollment.to_string(),
            self.total_infra.to_string(),
        ]
    }
}

impl TableRow for RegionYearRatio {
    fn headers() -> Vec<String> {
        vec![
            "School Year".to_string(),
            "Region Short".to_string(),
            COL_LEARNERS_PER_INFRA.to_string(),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.school_year.to_string(),
            self.region_short.clone(),
            ratio(self.learners_per_infra),
        ]
    }
}

impl TableRow for SectorEnrollment {
    fn headers() -> Vec<String> {
        vec![
            "Region Short".to_string(),
            "School Year".to_string(),
            "Sector".to_string(),
            "Total Enrollment".to_string(),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.region_short.clone(),
            self.school_year.to_string(),
            self.sector.clone(),
            self.total_enrollment.to_string(),
        ]
    }
}

impl TableRow for RegionRank {
    fn headers() -> Vec<String> {
        vec![COL_REGION.to_string(), COL_LEARNERS_PER_INFRA.to_string()]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.region.clone(), ratio(self.learners_per_infra)]
    }
}

/// Render rows as a column-aligned text table
pub fn render_text(table: &dyn Tabular) -> String {
    let headers = table.headers();
    let rows = table.text_rows();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&headers));
    out.push('\n');
    let total: usize = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in &rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

/// Write rows as CSV
pub fn write_csv<W: std::io::Write>(table: &dyn Tabular, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.headers())?;
    for row in table.text_rows() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
