//! Error types for financial insight operations

use insights_llm::LLMError;
use insights_prompt::PromptError;
use thiserror::Error;

/// Why financial statements could not be retrieved
///
/// The pipeline recovers from every variant locally by showing a generic
/// message; the cause is kept for logs and for the detail line in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure, timeout or an unexpected HTTP status
    #[error("Network error: {0}")]
    Network(String),

    /// The provider does not know the symbol or has no statements for it
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// The provider answered with data that could not be interpreted
    #[error("Malformed data: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Malformed(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}

/// Errors that end an insight request
#[derive(Debug, Error)]
pub enum InsightsError {
    /// Model loading or inference failed
    #[error("Model inference failed: {0}")]
    Inference(#[from] LLMError),

    /// Prompt could not be rendered
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for insight operations
pub type Result<T> = std::result::Result<T, InsightsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::UnknownSymbol("ZZZZ999".to_string());
        assert_eq!(err.to_string(), "Unknown symbol: ZZZZ999");

        let err = FetchError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn test_json_error_is_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(FetchError::from(json_err), FetchError::Malformed(_)));
    }

    #[test]
    fn test_llm_error_conversion() {
        let err: InsightsError = LLMError::RequestFailed("boom".to_string()).into();
        assert!(matches!(err, InsightsError::Inference(_)));
        assert!(err.to_string().contains("boom"));
    }
}
