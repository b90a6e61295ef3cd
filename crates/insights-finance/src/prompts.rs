//! Prompt templates for report sections

use crate::statements::{FinancialStatementSet, format_amount};
use insights_prompt::{JinjaTemplate, PromptRegistry, Result};
use serde::Serialize;

/// Registry name of the section prompt
pub const SECTION_PROMPT: &str = "insights.section";

/// Figures are listed only when `statements` is non-empty.
const SECTION_TEMPLATE: &str = "Section: {{ section }}\n\
Company: {{ ticker }}\n\
Value Proposition: {{ value_proposition }}\n\
{% if statements %}\n\
Financial Data (latest reported period):\n\
{% for statement in statements %}{{ statement.title }} ({{ statement.period }}):\n\
{% for item in statement.items %}- {{ item.label }}: {{ item.value }}\n\
{% endfor %}{% endfor %}{% endif %}\n\
Analyze the information and provide detailed insights.";

/// Create the section prompt template
pub fn section_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::new(SECTION_PROMPT, SECTION_TEMPLATE)
}

/// Register all report prompts with the given registry
pub fn register_prompts(registry: &mut PromptRegistry) -> Result<()> {
    registry.register(section_prompt()?);
    Ok(())
}

/// Latest-period figures of one statement, as passed to the template
#[derive(Debug, Clone, Serialize)]
pub struct StatementSummary {
    pub title: &'static str,
    pub period: String,
    pub items: Vec<SummaryItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryItem {
    pub label: String,
    pub value: String,
}

/// Summarise the most recent period of each non-empty statement
pub fn summarize_statements(statements: &FinancialStatementSet) -> Vec<StatementSummary> {
    statements
        .tables()
        .into_iter()
        .filter_map(|table| {
            let period = table.latest_period()?;
            let items = table
                .rows
                .iter()
                .filter_map(|row| {
                    row.values.first().copied().flatten().map(|v| SummaryItem {
                        label: row.label.clone(),
                        value: format_amount(v),
                    })
                })
                .collect::<Vec<_>>();

            (!items.is_empty()).then(|| StatementSummary {
                title: table.kind.title(),
                period: period.format("%Y-%m-%d").to_string(),
                items,
            })
        })
        .collect()
}
