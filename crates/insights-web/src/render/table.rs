//! Statement tables

use insights_finance::{FinancialTable, format_amount};
use serde::Serialize;

/// A statement table ready for the page template
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub title: &'static str,
    pub slug: &'static str,
    /// Period column headers, newest first
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub label: String,
    /// Formatted cells; missing values are empty strings
    pub cells: Vec<String>,
}

impl TableView {
    pub fn from_table(table: &FinancialTable) -> Self {
        Self {
            title: table.kind.title(),
            slug: table.kind.slug(),
            headers: table.periods.iter().map(ToString::to_string).collect(),
            rows: table
                .rows
                .iter()
                .map(|row| RowView {
                    label: row.label.clone(),
                    cells: row
                        .values
                        .iter()
                        .map(|v| v.map(format_amount).unwrap_or_default())
                        .collect(),
                })
                .collect(),
        }
    }
}
