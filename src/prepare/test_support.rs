//! Dataset builders shared by the preparation tests

use crate::dataset::{Cell, Dataset, Table, REQUIRED_COLUMNS};

#[derive(Debug, Clone)]
pub struct Row {
    pub year: &'static str,
    pub region: &'static str,
    pub level: &'static str,
    pub sector: &'static str,
    pub enrollment: u64,
    pub infra: Option<u64>,
}

pub fn shs_row(
    year: &'static str,
    region: &'static str,
    sector: &'static str,
    enrollment: u64,
    infra: Option<u64>,
) -> Row {
    Row {
        year,
        region,
        level: "Senior High School",
        sector,
        enrollment,
        infra,
    }
}

pub fn dataset(rows: Vec<Row>) -> Dataset {
    let mut headers: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    headers.push("Division".to_string());

    let cells = rows
        .into_iter()
        .map(|r| {
            vec![
                Cell::Text(r.year.to_string()),
                Cell::Text(r.region.to_string()),
                Cell::Text(r.level.to_string()),
                Cell::Text(r.sector.to_string()),
                Cell::Int(r.enrollment as i64),
                r.infra.map_or(Cell::Empty, |i| Cell::Int(i as i64)),
                Cell::Text("Sample Division".to_string()),
            ]
        })
        .collect();

    Dataset::from_table(Table::new(headers, cells).unwrap()).unwrap()
}
