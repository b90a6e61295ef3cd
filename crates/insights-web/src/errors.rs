use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use insights_finance::InsightsError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The model failed while generating a section
    #[error("{0}")]
    Insights(#[from] InsightsError),
    #[error("Template error: {0}")]
    Render(#[from] minijinja::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");
        match self {
            AppError::Insights(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
            AppError::Render(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
