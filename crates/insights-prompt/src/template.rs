//! Template seam

use crate::Result;

/// A named prompt that renders from JSON variables
///
/// Variables arrive as a `serde_json::Value` so the trait stays object safe.
pub trait PromptTemplate: Send + Sync {
    fn name(&self) -> &str;

    fn render(&self, vars: &serde_json::Value) -> Result<String>;

    /// Unrendered source
    fn raw_template(&self) -> &str;
}
