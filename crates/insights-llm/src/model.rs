//! Local model handle
//!
//! The model weights live in a file on local storage and are served by an
//! OpenAI-compatible runtime. [`ModelHandle`] owns the loaded model for the
//! life of the process: it is acquired lazily on first use (or eagerly via
//! [`ModelHandle::preloaded`]) and reused for every completion afterwards.
//! Dropping the handle releases the client and its connection pool.

use crate::providers::{OpenAIConfig, OpenAIProvider};
use crate::{CompletionRequest, LLMError, LLMProvider, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

/// Weights file the runtime is expected to host
pub const DEFAULT_WEIGHTS_PATH: &str = "models/llama-2-7b-chat.ggmlv3.q8_0.bin";
/// Model architecture identifier
pub const DEFAULT_MODEL_TYPE: &str = "llama";
/// Quantization format of the default weights
pub const DEFAULT_QUANTIZATION: &str = "q8_0";
/// Generation cap per prompt
pub const DEFAULT_MAX_NEW_TOKENS: usize = 256;
/// Near-greedy sampling
pub const DEFAULT_TEMPERATURE: f32 = 0.01;

/// Fixed sampling parameters applied to every completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_new_tokens: usize,
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Configuration of the locally hosted model
#[derive(Debug, Clone)]
pub struct LocalModelConfig {
    /// Path to the weights file
    pub weights_path: PathBuf,
    /// Model architecture (e.g. "llama")
    pub model_type: String,
    /// Quantization format (e.g. "q8_0")
    pub quantization: String,
    /// Sampling parameters
    pub options: GenerationOptions,
    /// Runtime endpoint configuration
    pub runtime: OpenAIConfig,
    /// Check that the weights file exists before the first completion
    pub verify_weights: bool,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            weights_path: PathBuf::from(DEFAULT_WEIGHTS_PATH),
            model_type: DEFAULT_MODEL_TYPE.to_string(),
            quantization: DEFAULT_QUANTIZATION.to_string(),
            options: GenerationOptions::default(),
            runtime: OpenAIConfig::new("not-needed"),
            verify_weights: true,
        }
    }
}

impl LocalModelConfig {
    /// Build the configuration from environment variables
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `INSIGHTS_MODEL_PATH` | `models/llama-2-7b-chat.ggmlv3.q8_0.bin` |
    /// | `INSIGHTS_MODEL_TYPE` | `llama` |
    /// | `INSIGHTS_MODEL_QUANTIZATION` | `q8_0` |
    /// | `INSIGHTS_VERIFY_WEIGHTS` | `true` |
    /// | `OPENAI_API_BASE` / `OPENAI_API_KEY` | local runtime defaults |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let verify_weights = std::env::var("INSIGHTS_VERIFY_WEIGHTS")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(defaults.verify_weights);

        Self {
            weights_path: std::env::var("INSIGHTS_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.weights_path),
            model_type: std::env::var("INSIGHTS_MODEL_TYPE").unwrap_or(defaults.model_type),
            quantization: std::env::var("INSIGHTS_MODEL_QUANTIZATION")
                .unwrap_or(defaults.quantization),
            options: defaults.options,
            runtime: OpenAIConfig::from_env(),
            verify_weights,
        }
    }

    /// Set the weights path
    pub fn with_weights_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.weights_path = path.into();
        self
    }

    /// Set the runtime endpoint
    pub fn with_runtime(mut self, runtime: OpenAIConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Model id sent to the runtime, derived from the weights file stem
    pub fn model_id(&self) -> String {
        model_id_from_path(&self.weights_path)
    }
}

fn model_id_from_path(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| DEFAULT_MODEL_TYPE.to_string(), |s| s.to_string_lossy().into_owned())
}

/// A loaded model ready to serve completions
pub struct LocalModel {
    provider: Arc<dyn LLMProvider>,
    model_id: String,
    options: GenerationOptions,
}

impl LocalModel {
    /// Load the model described by `config`
    #[instrument(skip(config), fields(weights = %config.weights_path.display()))]
    pub async fn load(config: &LocalModelConfig) -> Result<Self> {
        if config.verify_weights {
            let metadata = tokio::fs::metadata(&config.weights_path).await.map_err(|e| {
                LLMError::ModelLoadFailed {
                    path: config.weights_path.clone(),
                    detail: e.to_string(),
                }
            })?;
            if !metadata.is_file() {
                return Err(LLMError::ModelLoadFailed {
                    path: config.weights_path.clone(),
                    detail: "not a regular file".to_string(),
                });
            }
        }

        let provider = OpenAIProvider::with_config(config.runtime.clone())?;
        let model_id = config.model_id();
        info!(
            model = %model_id,
            model_type = %config.model_type,
            quantization = %config.quantization,
            "Loaded local model"
        );

        Ok(Self {
            provider: Arc::new(provider),
            model_id,
            options: config.options,
        })
    }

    /// Wrap an existing provider
    pub fn with_provider(
        provider: Arc<dyn LLMProvider>,
        model_id: impl Into<String>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
            options,
        }
    }

    /// Model identifier
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Sampling parameters in use
    pub fn options(&self) -> GenerationOptions {
        self.options
    }

    /// Complete a raw prompt and return the generated text
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest::from_prompt(&self.model_id, prompt)
            .with_max_tokens(self.options.max_new_tokens)
            .with_temperature(self.options.temperature);

        let response = self.provider.complete(request).await?;
        debug!(
            provider = self.provider.name(),
            output_tokens = response.usage.output_tokens,
            "Completion finished"
        );
        Ok(response.text)
    }
}

impl std::fmt::Debug for LocalModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalModel")
            .field("provider", &self.provider.name())
            .field("model_id", &self.model_id)
            .field("options", &self.options)
            .finish()
    }
}

/// Process-wide handle that loads the model once and shares it
#[derive(Debug)]
pub struct ModelHandle {
    config: LocalModelConfig,
    model: OnceCell<Arc<LocalModel>>,
}

impl ModelHandle {
    /// Create a handle that loads lazily on first use
    pub fn new(config: LocalModelConfig) -> Self {
        Self {
            config,
            model: OnceCell::new(),
        }
    }

    /// Create a handle around an already loaded model
    pub fn preloaded(model: LocalModel) -> Self {
        Self {
            config: LocalModelConfig::default(),
            model: OnceCell::new_with(Some(Arc::new(model))),
        }
    }

    /// Get the model, loading it if this is the first call
    ///
    /// A failed load leaves the handle empty so the next call retries.
    pub async fn get(&self) -> Result<Arc<LocalModel>> {
        self.model
            .get_or_try_init(|| async { LocalModel::load(&self.config).await.map(Arc::new) })
            .await
            .cloned()
    }

    /// Whether the model has been loaded
    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Configuration used for loading
    pub fn config(&self) -> &LocalModelConfig {
        &self.config
    }
}
