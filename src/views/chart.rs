//! Chart descriptors
//!
//! Tells the rendering layer what to plot: chart kind, the column names for
//! each axis, grouping and faceting columns, category order and labels. No
//! colors, sizes or layout live here.

use serde::Serialize;
use std::collections::BTreeMap;

/// Kind of chart to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    GroupedBar,
    HorizontalBar,
    Table,
}

/// Description of one chart over a prepared table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// Column on the x axis
    pub x: String,
    /// Columns plotted as values
    pub y: Vec<String>,
    /// Column splitting series by color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Column splitting the chart into side-by-side panels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
    /// Explicit category order per column
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub category_orders: BTreeMap<String, Vec<String>>,
    pub x_title: String,
    pub y_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_title: Option<String>,
    pub markers: bool,
    /// Draw the first category at the top
    pub reverse_y: bool,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: impl Into<String>, x: &str, y: &[&str]) -> Self {
        Self {
            kind,
            title: title.into(),
            x: x.to_string(),
            y: y.iter().map(|s| s.to_string()).collect(),
            color: None,
            facet: None,
            category_orders: BTreeMap::new(),
            x_title: x.to_string(),
            y_title: y.join(", "),
            legend_title: None,
            markers: false,
            reverse_y: false,
        }
    }

    /// Line chart with point markers
    pub fn line(title: impl Into<String>, x: &str, y: &[&str]) -> Self {
        let mut spec = Self::new(ChartKind::Line, title, x, y);
        spec.markers = true;
        spec
    }

    /// Bars grouped side by side per x category
    pub fn grouped_bar(title: impl Into<String>, x: &str, y: &str) -> Self {
        Self::new(ChartKind::GroupedBar, title, x, &[y])
    }

    /// Horizontal bars; `x` holds the value and `y` the category
    pub fn horizontal_bar(title: impl Into<String>, value: &str, category: &str) -> Self {
        Self::new(ChartKind::HorizontalBar, title, value, &[category])
    }

    /// Plain data table
    pub fn table(title: impl Into<String>) -> Self {
        Self::new(ChartKind::Table, title, "", &[])
    }

    pub fn color(mut self, column: &str) -> Self {
        self.color = Some(column.to_string());
        self
    }

    /// Facet by `column`, panels in the given order
    pub fn facet(mut self, column: &str, order: Vec<String>) -> Self {
        self.facet = Some(column.to_string());
        self.category_orders.insert(column.to_string(), order);
        self
    }

    pub fn category_order(mut self, column: &str, order: Vec<String>) -> Self {
        self.category_orders.insert(column.to_string(), order);
        self
    }

    pub fn axis_titles(mut self, x: &str, y: &str) -> Self {
        self.x_title = x.to_string();
        self.y_title = y.to_string();
        self
    }

    pub fn legend(mut self, title: &str) -> Self {
        self.legend_title = Some(title.to_string());
        self
    }

    pub fn reversed_y(mut self) -> Self {
        self.reverse_y = true;
        self
    }
}
