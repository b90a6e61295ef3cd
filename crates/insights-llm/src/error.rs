//! Error types for model operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    /// The runtime answered with an error status
    #[error("Model runtime request failed: {0}")]
    RequestFailed(String),

    #[error("Model runtime rejected the API key")]
    AuthenticationFailed,

    #[error("Model runtime rejected the request: {0}")]
    InvalidRequest(String),

    #[error("Model '{0}' is not served by the runtime")]
    ModelNotFound(String),

    /// The weights file is missing or unreadable
    #[error("Failed to load model weights from {path}: {detail}")]
    ModelLoadFailed { path: PathBuf, detail: String },

    /// The runtime could not be reached
    #[error("Model runtime unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected runtime response: {0}")]
    UnexpectedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = LLMError::ModelLoadFailed {
            path: PathBuf::from("models/missing.bin"),
            detail: "No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load model weights from models/missing.bin: No such file or directory"
        );
        assert_eq!(
            LLMError::ModelNotFound("llama".to_string()).to_string(),
            "Model 'llama' is not served by the runtime"
        );
    }
}
