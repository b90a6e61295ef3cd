//! Templates rendered with MiniJinja

use crate::{PromptError, PromptTemplate, Result};
use minijinja::{Environment, UndefinedBehavior, Value};

/// Prompt environment: strict about missing variables, no autoescaping,
/// trailing newlines preserved
fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

/// A prompt template in Jinja syntax
///
/// Referencing a variable that was not supplied is a render error, so a
/// prompt never silently loses a field.
///
/// ```
/// use insights_prompt::{JinjaTemplate, PromptTemplate};
/// use serde_json::json;
///
/// let template = JinjaTemplate::new("company", "Company: {{ ticker | upper }}").unwrap();
/// assert_eq!(template.render(&json!({ "ticker": "msft" })).unwrap(), "Company: MSFT");
/// ```
pub struct JinjaTemplate {
    name: String,
    source: String,
}

impl JinjaTemplate {
    /// Create a template, rejecting sources that do not compile
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let template = Self {
            name: name.into(),
            source: source.into(),
        };

        if let Err(e) = environment().template_from_str(&template.source) {
            return Err(PromptError::TemplateParseFailed {
                name: template.name,
                detail: e.to_string(),
            });
        }
        Ok(template)
    }
}

impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, vars: &serde_json::Value) -> Result<String> {
        environment()
            .render_str(&self.source, Value::from_serialize(vars))
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }

    fn raw_template(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
