//! Access to the locally hosted language model
//!
//! [`ModelHandle`] loads the model once per process and hands out a shared
//! [`LocalModel`]. Completions go through the [`LLMProvider`] seam, which
//! the chat-completions client in [`providers`] implements.

pub mod completion;
pub mod error;
pub mod messages;
pub mod model;
pub mod provider;
pub mod providers;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use model::{GenerationOptions, LocalModel, LocalModelConfig, ModelHandle};
pub use provider::LLMProvider;
