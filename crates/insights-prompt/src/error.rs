//! Prompt errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PromptError>;

#[derive(Error, Debug)]
pub enum PromptError {
    /// The template source did not compile
    #[error("Template '{name}' is invalid: {detail}")]
    TemplateParseFailed { name: String, detail: String },

    /// Rendering failed, usually on an undefined variable
    #[error("Template '{name}' could not be rendered: {detail}")]
    RenderError { name: String, detail: String },

    #[error("No template registered as '{0}'")]
    TemplateNotRegistered(String),
}
