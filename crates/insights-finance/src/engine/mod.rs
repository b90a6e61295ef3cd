//! Insight pipeline: fetch, generate, visualize

pub mod pipeline;

pub use pipeline::{InsightPipeline, PipelineOutcome, ReportSink, Submission};
