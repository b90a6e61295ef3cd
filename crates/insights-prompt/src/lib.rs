//! Prompt templates for the insights agent
//!
//! Templates are written in Jinja syntax, rendered by MiniJinja with strict
//! undefined handling, and looked up by name through a [`PromptRegistry`].

mod error;
mod jinja;
mod registry;
mod template;

pub use error::{PromptError, Result};
pub use jinja::JinjaTemplate;
pub use registry::PromptRegistry;
pub use template::PromptTemplate;
