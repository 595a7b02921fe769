use crate::processing::{ChunkUnit, PipelineConfig};
use std::env;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Paper Synth binaries.
///
/// Only the binaries and the HTTP layer read this; the pipeline itself receives a
/// [`PipelineConfig`] built by [`Config::pipeline_config`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend used for every summarization call.
    pub summarization_provider: SummarizationProvider,
    /// Optional model override passed to the provider.
    pub summarization_model: Option<String>,
    /// Optional base URL of the Hugging Face inference endpoint.
    pub huggingface_url: Option<String>,
    /// Optional bearer token for the Hugging Face inference endpoint.
    pub huggingface_api_token: Option<String>,
    /// Optional base URL of the Ollama runtime.
    pub ollama_url: Option<String>,
    /// Optional per-request timeout applied by the HTTP engines.
    pub summarization_timeout_secs: Option<u64>,
    /// Unit used when chunking documents for synthesis.
    pub chunk_unit: ChunkUnit,
    /// Optional override for the per-document chunk size.
    pub chunk_size: Option<NonZeroUsize>,
    /// Optional override for the minimum word count a chunk needs to be summarized.
    pub chunk_min_words: Option<usize>,
    /// Optional override for the number of concurrent chunk summarizations.
    pub summary_concurrency: Option<NonZeroUsize>,
    /// Optional override for the character ceiling applied to the final synthesis input.
    pub synthesis_input_limit: Option<NonZeroUsize>,
    /// Optional override for the character window used by direct text summarization.
    pub text_chunk_size: Option<NonZeroUsize>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Supported summarization backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummarizationProvider {
    /// Hosted (or self-hosted) Hugging Face inference API.
    HuggingFace,
    /// Local Ollama runtime.
    Ollama,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            summarization_provider: load_env("SUMMARIZATION_PROVIDER")?.parse().map_err(
                |()| ConfigError::InvalidValue("SUMMARIZATION_PROVIDER".to_string()),
            )?,
            summarization_model: load_env_optional("SUMMARIZATION_MODEL"),
            huggingface_url: load_env_optional("HUGGINGFACE_URL"),
            huggingface_api_token: load_env_optional("HUGGINGFACE_API_TOKEN"),
            ollama_url: load_env_optional("OLLAMA_URL"),
            summarization_timeout_secs: load_env_parsed("SUMMARIZATION_TIMEOUT_SECS")?,
            chunk_unit: load_env_parsed("CHUNK_UNIT")?.unwrap_or(ChunkUnit::Words),
            chunk_size: load_env_parsed("CHUNK_SIZE")?,
            chunk_min_words: load_env_parsed("CHUNK_MIN_WORDS")?,
            summary_concurrency: load_env_parsed("SUMMARY_CONCURRENCY")?,
            synthesis_input_limit: load_env_parsed("SYNTHESIS_INPUT_LIMIT")?,
            text_chunk_size: load_env_parsed("TEXT_CHUNK_SIZE")?,
            server_port: load_env_parsed("SERVER_PORT")?,
        })
    }

    /// Build the pipeline settings, applying overrides on top of the defaults.
    ///
    /// Character-unit documents default to the direct-text window (1000 characters, no word
    /// minimum); explicit `CHUNK_SIZE` and `CHUNK_MIN_WORDS` overrides still apply.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut pipeline = PipelineConfig::default();
        if self.chunk_unit == ChunkUnit::Characters {
            pipeline.document.size = pipeline.text.size;
            pipeline.document.min_words = pipeline.text.min_words;
        }
        pipeline.document.unit = self.chunk_unit;
        if let Some(size) = self.chunk_size {
            pipeline.document.size = size;
        }
        if let Some(min_words) = self.chunk_min_words {
            pipeline.document.min_words = min_words;
        }
        if let Some(size) = self.text_chunk_size {
            pipeline.text.size = size;
        }
        if let Some(concurrency) = self.summary_concurrency {
            pipeline.concurrency = concurrency;
        }
        if let Some(limit) = self.synthesis_input_limit {
            pipeline.synthesis_input_limit = limit;
        }
        pipeline
    }

    /// Emit the loaded settings at debug level, leaving credentials out.
    ///
    /// Call after the tracing subscriber is installed.
    pub fn log_loaded(&self) {
        tracing::debug!(
            provider = ?self.summarization_provider,
            model = ?self.summarization_model,
            token_configured = self.huggingface_api_token.is_some(),
            chunk_unit = %self.chunk_unit,
            chunk_size = ?self.chunk_size,
            server_port = ?self.server_port,
            "Loaded configuration"
        );
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_env_parsed<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    parse_optional(key, load_env_optional(key))
}

fn parse_optional<T: FromStr>(
    key: &str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl FromStr for SummarizationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}
