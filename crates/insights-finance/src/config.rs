//! Configuration for financial insight requests

use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Default Yahoo Finance fundamentals endpoint
pub const YAHOO_TIMESERIES_URL: &str =
    "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";

/// Reporting frequency of the fetched statements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementFrequency {
    /// Fiscal-year statements
    #[default]
    Annual,
    /// Fiscal-quarter statements
    Quarterly,
}

impl StatementFrequency {
    /// Prefix Yahoo uses for series keys of this frequency
    pub fn prefix(self) -> &'static str {
        match self {
            StatementFrequency::Annual => "annual",
            StatementFrequency::Quarterly => "quarterly",
        }
    }
}

impl FromStr for StatementFrequency {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "annual" | "yearly" => Ok(Self::Annual),
            "quarterly" => Ok(Self::Quarterly),
            other => Err(InsightsError::Config(format!(
                "unknown statement frequency '{other}'"
            ))),
        }
    }
}

/// What the section prompts tell the model about the company
///
/// `TickerOnly` sends the ticker and value proposition and nothing else,
/// even though the page shows the statements next to the analysis.
/// `WithStatements` also embeds the latest reported figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptGrounding {
    #[default]
    TickerOnly,
    WithStatements,
}

impl FromStr for PromptGrounding {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ticker_only" | "ticker" => Ok(Self::TickerOnly),
            "with_statements" | "statements" => Ok(Self::WithStatements),
            other => Err(InsightsError::Config(format!(
                "unknown prompt grounding '{other}'"
            ))),
        }
    }
}

/// How the three section prompts are issued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// One section after another, each shown as soon as it is ready
    #[default]
    Sequential,
    /// All sections at once, shown together after the last one returns
    Concurrent,
}

impl FromStr for GenerationMode {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "concurrent" | "parallel" => Ok(Self::Concurrent),
            other => Err(InsightsError::Config(format!(
                "unknown generation mode '{other}'"
            ))),
        }
    }
}

/// Configuration for insight requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// Statement frequency requested from the provider
    pub frequency: StatementFrequency,

    /// Prompt grounding policy
    pub grounding: PromptGrounding,

    /// Section generation mode
    pub generation_mode: GenerationMode,

    /// Timeout for each statement request
    pub request_timeout: Duration,

    /// Load the model at startup instead of on the first request
    pub preload_model: bool,

    /// Fundamentals endpoint
    pub yahoo_base_url: String,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            frequency: StatementFrequency::Annual,
            grounding: PromptGrounding::TickerOnly,
            generation_mode: GenerationMode::Sequential,
            request_timeout: Duration::from_secs(30),
            preload_model: false,
            yahoo_base_url: YAHOO_TIMESERIES_URL.to_string(),
        }
    }
}

impl InsightsConfig {
    /// Create a new configuration builder
    pub fn builder() -> InsightsConfigBuilder {
        InsightsConfigBuilder::default()
    }

    /// Load configuration from `INSIGHTS_*` environment variables
    ///
    /// Unset variables keep their defaults; set but invalid ones are errors.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder();

        if let Ok(value) = std::env::var("INSIGHTS_STATEMENT_FREQUENCY") {
            builder = builder.frequency(value.parse()?);
        }
        if let Ok(value) = std::env::var("INSIGHTS_PROMPT_GROUNDING") {
            builder = builder.grounding(value.parse()?);
        }
        if let Ok(value) = std::env::var("INSIGHTS_GENERATION_MODE") {
            builder = builder.generation_mode(value.parse()?);
        }
        if let Ok(value) = std::env::var("INSIGHTS_REQUEST_TIMEOUT_SECS") {
            let secs = value.trim().parse::<u64>().map_err(|e| {
                InsightsError::Config(format!("INSIGHTS_REQUEST_TIMEOUT_SECS: {e}"))
            })?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Ok(value) = std::env::var("INSIGHTS_PRELOAD_MODEL") {
            builder = builder.preload_model(matches!(
                value.trim().to_lowercase().as_str(),
                "1" | "true" | "yes"
            ));
        }
        if let Ok(value) = std::env::var("INSIGHTS_YAHOO_BASE_URL") {
            builder = builder.yahoo_base_url(value);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(InsightsError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        crate::api::yahoo::parse_base_url(&self.yahoo_base_url)?;

        Ok(())
    }
}

/// Builder for InsightsConfig
#[derive(Debug, Default)]
pub struct InsightsConfigBuilder {
    frequency: Option<StatementFrequency>,
    grounding: Option<PromptGrounding>,
    generation_mode: Option<GenerationMode>,
    request_timeout: Option<Duration>,
    preload_model: Option<bool>,
    yahoo_base_url: Option<String>,
}

impl InsightsConfigBuilder {
    /// Set the statement frequency
    pub fn frequency(mut self, frequency: StatementFrequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Set the prompt grounding policy
    pub fn grounding(mut self, grounding: PromptGrounding) -> Self {
        self.grounding = Some(grounding);
        self
    }

    /// Set the generation mode
    pub fn generation_mode(mut self, mode: GenerationMode) -> Self {
        self.generation_mode = Some(mode);
        self
    }

    /// Set the statement request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Load the model at startup
    pub fn preload_model(mut self, preload: bool) -> Self {
        self.preload_model = Some(preload);
        self
    }

    /// Override the fundamentals endpoint
    pub fn yahoo_base_url(mut self, url: impl Into<String>) -> Self {
        self.yahoo_base_url = Some(url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<InsightsConfig> {
        let defaults = InsightsConfig::default();

        let config = InsightsConfig {
            frequency: self.frequency.unwrap_or(defaults.frequency),
            grounding: self.grounding.unwrap_or(defaults.grounding),
            generation_mode: self.generation_mode.unwrap_or(defaults.generation_mode),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            preload_model: self.preload_model.unwrap_or(defaults.preload_model),
            yahoo_base_url: self.yahoo_base_url.unwrap_or(defaults.yahoo_base_url),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InsightsConfig::default();
        assert_eq!(config.frequency, StatementFrequency::Annual);
        assert_eq!(config.grounding, PromptGrounding::TickerOnly);
        assert_eq!(config.generation_mode, GenerationMode::Sequential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = InsightsConfig::builder()
            .frequency(StatementFrequency::Quarterly)
            .generation_mode(GenerationMode::Concurrent)
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.frequency.prefix(), "quarterly");
        assert_eq!(config.generation_mode, GenerationMode::Concurrent);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = InsightsConfig::builder()
            .request_timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(InsightsError::Config(_))));
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(
            "Quarterly".parse::<StatementFrequency>().unwrap(),
            StatementFrequency::Quarterly
        );
        assert_eq!(
            "with_statements".parse::<PromptGrounding>().unwrap(),
            PromptGrounding::WithStatements
        );
        assert_eq!(
            "parallel".parse::<GenerationMode>().unwrap(),
            GenerationMode::Concurrent
        );
        assert!("monthly".parse::<StatementFrequency>().is_err());
    }
}
