//! Financial insights
//!
//! This crate turns a ticker and a value proposition into a financial
//! insights report:
//!
//! - **Statements**: balance sheet, income statement and cash flow tables
//! - **Fetching**: Yahoo Finance client behind the [`StatementProvider`] seam
//! - **Sections**: one prompt per [`Section`], answered by the local model
//! - **Pipeline**: [`InsightPipeline`] drives fetch, generation and
//!   visualization and reports progress to a [`ReportSink`]
//!
//! # Example
//!
//! ```ignore
//! use insights_finance::{InsightPipeline, InsightsConfig, Submission};
//! use insights_llm::{LocalModelConfig, ModelHandle};
//! use std::sync::Arc;
//!
//! let config = InsightsConfig::from_env()?;
//! let model = Arc::new(ModelHandle::new(LocalModelConfig::from_env()));
//! let pipeline = InsightPipeline::from_config(&config, model)?;
//!
//! let outcome = pipeline
//!     .run(&Submission::new("AAPL", "Premium hardware ecosystem"), &mut sink)
//!     .await?;
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod prompts;
pub mod report;
pub mod statements;

pub use api::YahooStatementProvider;
pub use config::{GenerationMode, InsightsConfig, PromptGrounding, StatementFrequency};
pub use engine::{InsightPipeline, PipelineOutcome, ReportSink, Submission};
pub use error::{FetchError, InsightsError, Result};
pub use fetcher::{FinancialDataFetcher, StatementProvider};
pub use report::{CHUNK_SIZE, ReportGenerator, Section, SectionReport, chunk_response};
pub use statements::{
    FinancialStatementSet, FinancialTable, LineItem, Observation, StatementKind, display_name,
    format_amount,
};
