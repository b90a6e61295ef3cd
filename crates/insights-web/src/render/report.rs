//! HTML report assembled from pipeline events

use super::chart::LineChart;
use super::table::TableView;
use insights_finance::{FetchError, FinancialStatementSet, ReportSink, SectionReport};
use serde::Serialize;

/// Message shown whenever statements cannot be fetched
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching financial data.";

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub title: &'static str,
    pub chunks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchErrorView {
    pub message: &'static str,
    pub detail: String,
}

/// Collects pipeline output in display order
#[derive(Debug, Clone, Default, Serialize)]
pub struct HtmlReport {
    pub tables: Vec<TableView>,
    pub sections: Vec<SectionView>,
    pub charts: Vec<LineChart>,
    pub fetch_error: Option<FetchErrorView>,
}

impl HtmlReport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for HtmlReport {
    fn on_statements(&mut self, statements: &FinancialStatementSet) {
        self.tables = statements
            .tables()
            .into_iter()
            .map(TableView::from_table)
            .collect();
    }

    fn on_fetch_failed(&mut self, error: &FetchError) {
        self.fetch_error = Some(FetchErrorView {
            message: FETCH_ERROR_MESSAGE,
            detail: error.to_string(),
        });
    }

    fn on_section(&mut self, report: &SectionReport) {
        self.sections.push(SectionView {
            title: report.section.label(),
            chunks: report.chunks.clone(),
        });
    }

    fn on_visualize(&mut self, statements: &FinancialStatementSet) {
        self.charts = statements
            .tables()
            .into_iter()
            .map(LineChart::from_table)
            .collect();
    }
}
