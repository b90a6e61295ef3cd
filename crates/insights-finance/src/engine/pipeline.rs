//! The insight pipeline
//!
//! A submission moves through fetch, three section generations and the
//! visualization step. Results are pushed to a [`ReportSink`] in display
//! order as they become available:
//!
//! 1. `on_statements` once the statements are fetched
//! 2. `on_section` for each section, in [`Section::ALL`] order
//! 3. `on_visualize` after the last section
//!
//! A fetch failure calls `on_fetch_failed` and stops before the model is
//! touched. A model failure is returned as an error and nothing further is
//! emitted.

use crate::api::YahooStatementProvider;
use crate::config::{GenerationMode, InsightsConfig};
use crate::error::{FetchError, Result};
use crate::fetcher::{FinancialDataFetcher, StatementProvider};
use crate::report::{ReportGenerator, Section, SectionReport};
use crate::statements::FinancialStatementSet;
use futures::future::try_join_all;
use insights_llm::ModelHandle;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Raw form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub ticker: String,
    pub value_proposition: String,
}

impl Submission {
    pub fn new(ticker: impl Into<String>, value_proposition: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            value_proposition: value_proposition.into(),
        }
    }

    /// Both fields are non-empty
    ///
    /// Whitespace counts as content: a blank ticker is left to fail in the
    /// fetch, and the value proposition is used verbatim.
    pub fn is_complete(&self) -> bool {
        !self.ticker.is_empty() && !self.value_proposition.is_empty()
    }

    /// Normalised ticker: trimmed and upper-cased
    pub fn ticker(&self) -> String {
        self.ticker.trim().to_uppercase()
    }
}

/// Receives pipeline results in display order
pub trait ReportSink: Send {
    fn on_statements(&mut self, statements: &FinancialStatementSet);

    fn on_fetch_failed(&mut self, error: &FetchError);

    fn on_section(&mut self, report: &SectionReport);

    fn on_visualize(&mut self, statements: &FinancialStatementSet);
}

/// How a pipeline run ended
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// A field was empty; nothing was fetched or generated
    Skipped,
    /// Statements could not be fetched; the model was not called
    FetchFailed(FetchError),
    /// Every section was generated and the charts were emitted
    Completed {
        statements: FinancialStatementSet,
        sections: Vec<SectionReport>,
    },
}

/// Runs fetch, generation and visualization for one submission
#[derive(Debug, Clone)]
pub struct InsightPipeline {
    fetcher: FinancialDataFetcher,
    generator: ReportGenerator,
    mode: GenerationMode,
}

impl InsightPipeline {
    pub fn new(
        fetcher: FinancialDataFetcher,
        generator: ReportGenerator,
        mode: GenerationMode,
    ) -> Self {
        Self {
            fetcher,
            generator,
            mode,
        }
    }

    /// Build the pipeline against Yahoo Finance and the given model
    pub fn from_config(config: &InsightsConfig, model: Arc<ModelHandle>) -> Result<Self> {
        let provider: Arc<dyn StatementProvider> = Arc::new(YahooStatementProvider::new(config)?);
        let generator = ReportGenerator::new(model, config.grounding)?;

        Ok(Self::new(
            FinancialDataFetcher::new(provider),
            generator,
            config.generation_mode,
        ))
    }

    /// Run the pipeline for `submission`
    #[instrument(skip(self, submission, sink), fields(ticker = %submission.ticker.trim()))]
    pub async fn run(
        &self,
        submission: &Submission,
        sink: &mut dyn ReportSink,
    ) -> Result<PipelineOutcome> {
        if !submission.is_complete() {
            return Ok(PipelineOutcome::Skipped);
        }

        let ticker = submission.ticker();
        let statements = match self.fetcher.fetch(&ticker).await {
            Ok(statements) => statements,
            Err(err) => {
                sink.on_fetch_failed(&err);
                return Ok(PipelineOutcome::FetchFailed(err));
            }
        };
        sink.on_statements(&statements);

        let value_proposition = submission.value_proposition.as_str();
        let sections = match self.mode {
            GenerationMode::Sequential => {
                let mut sections = Vec::with_capacity(Section::ALL.len());
                for section in Section::ALL {
                    let report = self
                        .generator
                        .generate(section, &ticker, value_proposition, Some(&statements))
                        .await
                        .inspect_err(|e| warn!(%section, error = %e, "Section generation failed"))?;
                    sink.on_section(&report);
                    sections.push(report);
                }
                sections
            }
            GenerationMode::Concurrent => {
                let sections = try_join_all(Section::ALL.into_iter().map(|section| {
                    self.generator
                        .generate(section, &ticker, value_proposition, Some(&statements))
                }))
                .await
                .inspect_err(|e| warn!(error = %e, "Section generation failed"))?;
                for report in &sections {
                    sink.on_section(report);
                }
                sections
            }
        };

        sink.on_visualize(&statements);
        info!(sections = sections.len(), "Insights complete");

        Ok(PipelineOutcome::Completed {
            statements,
            sections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PromptGrounding;
    use crate::error::InsightsError;
    use crate::fetcher::MockStatementProvider;
    use crate::fetcher::tests::sample_statements;
    use async_trait::async_trait;
    use insights_llm::{
        CompletionRequest, CompletionResponse, GenerationOptions, LLMError, LLMProvider,
        LocalModel,
    };
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Statements(String),
        FetchFailed(FetchError),
        Section(Section),
        Visualize,
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<Event>,
    }

    impl ReportSink for RecordingSink {
        fn on_statements(&mut self, statements: &FinancialStatementSet) {
            self.events.push(Event::Statements(statements.ticker.clone()));
        }

        fn on_fetch_failed(&mut self, error: &FetchError) {
            self.events.push(Event::FetchFailed(error.clone()));
        }

        fn on_section(&mut self, report: &SectionReport) {
            self.events.push(Event::Section(report.section));
        }

        fn on_visualize(&mut self, _statements: &FinancialStatementSet) {
            self.events.push(Event::Visualize);
        }
    }

    /// Answers every prompt, optionally failing one call or delaying by section
    #[derive(Default)]
    struct FakeModel {
        prompts: Mutex<Vec<String>>,
        fail_on_call: Option<usize>,
        slow_first_section: bool,
    }

    #[async_trait]
    impl LLMProvider for FakeModel {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> insights_llm::Result<CompletionResponse> {
            let prompt = request.prompt().unwrap_or_default().to_string();
            let call = {
                let mut prompts = self.prompts.lock().unwrap();
                prompts.push(prompt.clone());
                prompts.len() - 1
            };

            if self.slow_first_section && prompt.starts_with("Section: Earnings") {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            if self.fail_on_call == Some(call) {
                return Err(LLMError::RequestFailed("inference crashed".to_string()));
            }

            Ok(CompletionResponse::new(format!("analysis #{call}")))
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn pipeline(
        provider: MockStatementProvider,
        model: Arc<FakeModel>,
        mode: GenerationMode,
    ) -> InsightPipeline {
        let model = LocalModel::with_provider(model, "fake", GenerationOptions::default());
        let generator = ReportGenerator::new(
            Arc::new(ModelHandle::preloaded(model)),
            PromptGrounding::TickerOnly,
        )
        .unwrap();
        InsightPipeline::new(FinancialDataFetcher::new(Arc::new(provider)), generator, mode)
    }

    fn statements_provider() -> MockStatementProvider {
        let mut provider = MockStatementProvider::new();
        provider
            .expect_lookup()
            .times(1)
            .returning(|ticker| Ok(sample_statements(ticker)));
        provider
    }

    #[tokio::test]
    async fn test_three_sections_with_distinct_prompts() {
        let model = Arc::new(FakeModel::default());
        let pipeline = pipeline(statements_provider(), model.clone(), GenerationMode::Sequential);
        let mut sink = RecordingSink::default();

        let outcome = pipeline
            .run(
                &Submission::new("AAPL", "Premium hardware ecosystem"),
                &mut sink,
            )
            .await
            .unwrap();

        assert_eq!(
            sink.events,
            vec![
                Event::Statements("AAPL".to_string()),
                Event::Section(Section::EarningsDataAnalysis),
                Event::Section(Section::FinancialDataAnalysis),
                Event::Section(Section::BrainstormValues),
                Event::Visualize,
            ]
        );

        let prompts = model.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 3);
        for (prompt, section) in prompts.iter().zip(Section::ALL) {
            let expected = format!(
                "Section: {}\nCompany: AAPL\nValue Proposition: Premium hardware ecosystem\n\nAnalyze the information and provide detailed insights.",
                section.label()
            );
            assert_eq!(prompt, &expected);
        }

        match outcome {
            PipelineOutcome::Completed { sections, .. } => {
                assert_eq!(sections.len(), 3);
                assert_eq!(sections[0].chunks, vec!["analysis #0".to_string()]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ticker_is_normalised() {
        let mut provider = MockStatementProvider::new();
        provider
            .expect_lookup()
            .withf(|ticker| ticker == "MSFT")
            .times(1)
            .returning(|ticker| Ok(sample_statements(ticker)));
        let model = Arc::new(FakeModel::default());
        let pipeline = pipeline(provider, model.clone(), GenerationMode::Sequential);

        pipeline
            .run(&Submission::new("  msft ", "Cloud platform"), &mut RecordingSink::default())
            .await
            .unwrap();

        assert!(model.prompts.lock().unwrap()[0].contains("Company: MSFT\n"));
    }

    #[tokio::test]
    async fn test_incomplete_submission_is_skipped() {
        let mut provider = MockStatementProvider::new();
        provider.expect_lookup().times(0);
        let model = Arc::new(FakeModel::default());
        let pipeline = pipeline(provider, model.clone(), GenerationMode::Sequential);

        for submission in [
            Submission::new("AAPL", ""),
            Submission::new("", "Premium hardware ecosystem"),
            Submission::default(),
        ] {
            let mut sink = RecordingSink::default();
            let outcome = pipeline.run(&submission, &mut sink).await.unwrap();
            assert_eq!(outcome, PipelineOutcome::Skipped);
            assert!(sink.events.is_empty());
        }
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_value_proposition_is_used_verbatim() {
        let model = Arc::new(FakeModel::default());
        let pipeline = pipeline(statements_provider(), model.clone(), GenerationMode::Sequential);
        let mut sink = RecordingSink::default();

        let outcome = pipeline
            .run(&Submission::new("AAPL", "   "), &mut sink)
            .await
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::Completed { .. }));
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("Value Proposition:    \n"));
    }

    #[tokio::test]
    async fn test_blank_ticker_fails_in_fetch() {
        let mut provider = MockStatementProvider::new();
        provider.expect_lookup().times(0);
        let model = Arc::new(FakeModel::default());
        let pipeline = pipeline(provider, model.clone(), GenerationMode::Sequential);
        let mut sink = RecordingSink::default();

        let outcome = pipeline
            .run(&Submission::new("   ", "Premium hardware ecosystem"), &mut sink)
            .await
            .unwrap();

        let err = FetchError::UnknownSymbol(String::new());
        assert_eq!(outcome, PipelineOutcome::FetchFailed(err.clone()));
        assert_eq!(sink.events, vec![Event::FetchFailed(err)]);
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_stops_before_model() {
        let mut provider = MockStatementProvider::new();
        provider
            .expect_lookup()
            .returning(|ticker| Err(FetchError::UnknownSymbol(ticker.to_string())));
        let model = Arc::new(FakeModel::default());
        let pipeline = pipeline(provider, model.clone(), GenerationMode::Sequential);
        let mut sink = RecordingSink::default();

        let outcome = pipeline
            .run(&Submission::new("ZZZZ999", "Anything"), &mut sink)
            .await
            .unwrap();

        let expected = FetchError::UnknownSymbol("ZZZZ999".to_string());
        assert_eq!(outcome, PipelineOutcome::FetchFailed(expected.clone()));
        assert_eq!(sink.events, vec![Event::FetchFailed(expected)]);
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_aborts_remaining_sections() {
        let model = Arc::new(FakeModel {
            fail_on_call: Some(1),
            ..FakeModel::default()
        });
        let pipeline = pipeline(statements_provider(), model.clone(), GenerationMode::Sequential);
        let mut sink = RecordingSink::default();

        let err = pipeline
            .run(&Submission::new("AAPL", "Premium hardware ecosystem"), &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, InsightsError::Inference(_)));
        assert_eq!(
            sink.events,
            vec![
                Event::Statements("AAPL".to_string()),
                Event::Section(Section::EarningsDataAnalysis),
            ]
        );
        assert_eq!(model.prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_mode_keeps_section_order() {
        let model = Arc::new(FakeModel {
            slow_first_section: true,
            ..FakeModel::default()
        });
        let pipeline = pipeline(statements_provider(), model.clone(), GenerationMode::Concurrent);
        let mut sink = RecordingSink::default();

        let outcome = pipeline
            .run(&Submission::new("AAPL", "Premium hardware ecosystem"), &mut sink)
            .await
            .unwrap();

        assert_eq!(
            sink.events[1..4],
            [
                Event::Section(Section::EarningsDataAnalysis),
                Event::Section(Section::FinancialDataAnalysis),
                Event::Section(Section::BrainstormValues),
            ]
        );
        assert_eq!(sink.events.last(), Some(&Event::Visualize));
        assert!(matches!(outcome, PipelineOutcome::Completed { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_mode_failure_emits_no_sections() {
        let model = Arc::new(FakeModel {
            fail_on_call: Some(2),
            ..FakeModel::default()
        });
        let pipeline = pipeline(statements_provider(), model, GenerationMode::Concurrent);
        let mut sink = RecordingSink::default();

        let result = pipeline
            .run(&Submission::new("AAPL", "Premium hardware ecosystem"), &mut sink)
            .await;

        assert!(result.is_err());
        assert_eq!(sink.events, vec![Event::Statements("AAPL".to_string())]);
    }
}
