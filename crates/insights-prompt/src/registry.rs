//! Named template lookup
//!
//! Templates are registered once at startup and only read afterwards, so
//! the registry is built with `&mut self` and shared behind an `Arc`.

use crate::{PromptError, PromptTemplate, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Templates keyed by name
///
/// ```
/// use insights_prompt::{JinjaTemplate, PromptRegistry};
/// use serde_json::json;
///
/// let mut registry = PromptRegistry::new();
/// registry.register(JinjaTemplate::new("ticker", "Company: {{ ticker }}").unwrap());
///
/// let text = registry.render("ticker", &json!({ "ticker": "AAPL" })).unwrap();
/// assert_eq!(text, "Company: AAPL");
/// ```
#[derive(Default)]
pub struct PromptRegistry {
    templates: HashMap<String, Arc<dyn PromptTemplate>>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, returning the one it replaced
    pub fn register<T: PromptTemplate + 'static>(
        &mut self,
        template: T,
    ) -> Option<Arc<dyn PromptTemplate>> {
        self.templates
            .insert(template.name().to_string(), Arc::new(template))
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PromptTemplate>> {
        self.templates.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn render(&self, name: &str, vars: &serde_json::Value) -> Result<String> {
        self.templates
            .get(name)
            .ok_or_else(|| PromptError::TemplateNotRegistered(name.to_string()))?
            .render(vars)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl std::fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("templates", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JinjaTemplate;
    use serde_json::json;

    fn template(name: &str, source: &str) -> JinjaTemplate {
        JinjaTemplate::new(name, source).unwrap()
    }

    #[test]
    fn test_lookup() {
        let mut registry = PromptRegistry::new();
        assert!(registry.is_empty());

        registry.register(template("section", "Section: {{ section }}"));
        assert!(registry.contains("section"));
        assert_eq!(registry.get("section").unwrap().name(), "section");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_unknown_name() {
        let registry = PromptRegistry::new();
        let err = registry.render("missing", &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "No template registered as 'missing'");
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = PromptRegistry::new();
        registry.register(template("valuation", "V"));
        registry.register(template("earnings", "E"));
        assert_eq!(registry.names(), vec!["earnings", "valuation"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reregister_returns_previous() {
        let mut registry = PromptRegistry::new();
        assert!(registry.register(template("t", "first")).is_none());

        let previous = registry.register(template("t", "second")).unwrap();
        assert_eq!(previous.raw_template(), "first");
        assert_eq!(registry.render("t", &json!({})).unwrap(), "second");
    }
}
