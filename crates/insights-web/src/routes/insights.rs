use axum::{Form, Router, extract::State, response::Html, routing::post};
use insights_finance::{PipelineOutcome, Submission};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::render::{FormValues, HtmlReport};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/insights", post(generate_insights))
}

#[derive(Debug, Deserialize)]
pub struct InsightsForm {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub value_proposition: String,
}

/// Run the pipeline and render the page
///
/// An incomplete form is shown again unchanged. A fetch failure is shown
/// on the form page. A model failure ends the request with a 500.
async fn generate_insights(
    State(state): State<AppState>,
    Form(form): Form<InsightsForm>,
) -> Result<Html<String>, AppError> {
    let submission = Submission::new(form.ticker.clone(), form.value_proposition.clone());
    let values = FormValues {
        ticker: form.ticker,
        value_proposition: form.value_proposition,
    };

    let mut report = HtmlReport::new();
    let outcome = state.pipeline.run(&submission, &mut report).await?;

    let page = match outcome {
        PipelineOutcome::Skipped => {
            info!("POST /insights - incomplete form, nothing to do");
            state.pages.index(&values, None)?
        }
        PipelineOutcome::FetchFailed(_) | PipelineOutcome::Completed { .. } => {
            state.pages.index(&values, Some(&report))?
        }
    };

    Ok(Html(page))
}
