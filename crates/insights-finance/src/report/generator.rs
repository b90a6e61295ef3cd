//! Section generation
//!
//! [`ReportGenerator`] renders the prompt for a section, sends it to the
//! shared local model and splits the answer into display chunks. Model
//! errors are returned as-is; the generator does not retry or recover.

use super::chunk::{CHUNK_SIZE, chunk_response};
use super::section::Section;
use crate::config::PromptGrounding;
use crate::error::Result;
use crate::prompts::{SECTION_PROMPT, register_prompts, summarize_statements};
use crate::statements::FinancialStatementSet;
use insights_llm::ModelHandle;
use insights_prompt::PromptRegistry;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Generated text of one section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub section: Section,
    /// Prompt that produced the text
    pub prompt: String,
    /// Response split into display chunks
    pub chunks: Vec<String>,
}

impl SectionReport {
    /// The full response text
    pub fn text(&self) -> String {
        self.chunks.concat()
    }
}

/// Builds section prompts and obtains the model's analysis
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    model: Arc<ModelHandle>,
    prompts: Arc<PromptRegistry>,
    grounding: PromptGrounding,
}

impl ReportGenerator {
    /// Create a generator with the report prompts registered
    pub fn new(model: Arc<ModelHandle>, grounding: PromptGrounding) -> Result<Self> {
        let mut prompts = PromptRegistry::new();
        register_prompts(&mut prompts)?;

        Ok(Self {
            model,
            prompts: Arc::new(prompts),
            grounding,
        })
    }

    /// Render the prompt for `section`
    ///
    /// Statement figures are included only under
    /// [`PromptGrounding::WithStatements`].
    pub fn build_prompt(
        &self,
        section: Section,
        ticker: &str,
        value_proposition: &str,
        statements: Option<&FinancialStatementSet>,
    ) -> Result<String> {
        let summary = match (self.grounding, statements) {
            (PromptGrounding::WithStatements, Some(statements)) => summarize_statements(statements),
            _ => Vec::new(),
        };

        let prompt = self.prompts.render(
            SECTION_PROMPT,
            &json!({
                "section": section.label(),
                "ticker": ticker,
                "value_proposition": value_proposition,
                "statements": summary,
            }),
        )?;
        Ok(prompt)
    }

    /// Generate one section
    #[instrument(skip(self, section, value_proposition, statements), fields(section = %section))]
    pub async fn generate(
        &self,
        section: Section,
        ticker: &str,
        value_proposition: &str,
        statements: Option<&FinancialStatementSet>,
    ) -> Result<SectionReport> {
        let prompt = self.build_prompt(section, ticker, value_proposition, statements)?;
        debug!(prompt_chars = prompt.chars().count(), "Rendered section prompt");

        let model = self.model.get().await?;
        let response = model.complete(&prompt).await?;
        let chunks = chunk_response(&response, CHUNK_SIZE);
        info!(
            response_chars = response.chars().count(),
            chunks = chunks.len(),
            "Section generated"
        );

        Ok(SectionReport {
            section,
            prompt,
            chunks,
        })
    }
}
