//! Enrollview Views
//!
//! Turns a loaded dataset into the four dashboard views plus the raw SHS
//! table. Each view carries its prepared rows, a chart descriptor and a
//! caption; rendering is left to the caller.
//!
//! - **dashboard**: `Dashboard` builder and year selection defaults
//! - **chart**: chart descriptors
//! - **table**: text and CSV output for the CLI

pub mod chart;
pub mod dashboard;
pub mod table;

pub use chart::{ChartKind, ChartSpec};
pub use dashboard::{
    Dashboard, DashboardViews, DatasetSummary, RawView, ResolvedSelection, View, ViewSelection,
};
pub use table::{render_text, write_csv, TableRow, Tabular};
