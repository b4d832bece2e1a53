use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_DATABASE_PATH: &str = "database.db";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 5000;
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_BART_MODEL: &str = "llama3.1:8b";
const DEFAULT_T5_MODEL: &str = "llama3.2:1b";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Textbrief server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// SQLite file holding the summary history.
    pub database_path: PathBuf,
    /// Directory receiving raw uploaded documents.
    pub upload_dir: PathBuf,
    /// Address the HTTP listener binds to.
    pub server_host: String,
    /// Port the HTTP listener binds to.
    pub server_port: u16,
    /// Provider backing the registered summarization models.
    pub summarization_provider: SummarizationProvider,
    /// Base URL of the Ollama runtime.
    pub ollama_url: String,
    /// Ollama model served under the `bart` name.
    pub bart_model: String,
    /// Ollama model served under the `t5` name.
    pub t5_model: String,
    /// Upper bound on a single backend invocation, in seconds.
    pub summarization_timeout_secs: u64,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

/// Supported summarization providers.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummarizationProvider {
    /// Local Ollama runtime.
    Ollama,
    /// Built-in lead-sentence summarizer that needs no model runtime.
    Extractive,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_path: load_env_optional("DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
                .into(),
            upload_dir: load_env_optional("UPLOAD_DIR")
                .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string())
                .into(),
            server_host: load_env_optional("SERVER_HOST")
                .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_env_optional("SERVER_PORT")?.unwrap_or(DEFAULT_SERVER_PORT),
            summarization_provider: load_env_optional("SUMMARIZATION_PROVIDER")
                .map(|value| {
                    value.parse().map_err(|()| {
                        ConfigError::InvalidValue("SUMMARIZATION_PROVIDER".to_string())
                    })
                })
                .transpose()?
                .unwrap_or(SummarizationProvider::Ollama),
            ollama_url: load_env_optional("OLLAMA_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            bart_model: load_env_optional("SUMMARY_MODEL_BART")
                .unwrap_or_else(|| DEFAULT_BART_MODEL.to_string()),
            t5_model: load_env_optional("SUMMARY_MODEL_T5")
                .unwrap_or_else(|| DEFAULT_T5_MODEL.to_string()),
            summarization_timeout_secs: require_nonzero(
                "SUMMARIZATION_TIMEOUT_SECS",
                parse_env_optional("SUMMARIZATION_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
            )?,
            max_upload_bytes: parse_env_optional("MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }

    /// Backend invocation timeout as a [`Duration`].
    pub fn summarization_timeout(&self) -> Duration {
        Duration::from_secs(self.summarization_timeout_secs)
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// A zero timeout would expire every backend call immediately.
fn require_nonzero(key: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue(key.to_string()));
    }
    Ok(value)
}

impl std::str::FromStr for SummarizationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "extractive" | "none" => Ok(Self::Extractive),
            _ => Err(()),
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
///
/// `overrides` is applied after the environment is read so command-line flags win.
pub fn init_config(overrides: impl FnOnce(&mut Config)) -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let mut config = Config::from_env()?;
    overrides(&mut config);
    tracing::debug!(
        database = %config.database_path.display(),
        uploads = %config.upload_dir.display(),
        server_port = config.server_port,
        provider = ?config.summarization_provider,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_known_names() {
        assert_eq!(
            "Ollama".parse::<SummarizationProvider>(),
            Ok(SummarizationProvider::Ollama)
        );
        assert_eq!(
            " extractive ".parse::<SummarizationProvider>(),
            Ok(SummarizationProvider::Extractive)
        );
        assert!("openai".parse::<SummarizationProvider>().is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = require_nonzero("SUMMARIZATION_TIMEOUT_SECS", 0).expect_err("zero timeout");
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "SUMMARIZATION_TIMEOUT_SECS"));
        assert_eq!(require_nonzero("SUMMARIZATION_TIMEOUT_SECS", 120).ok(), Some(120));
    }

    #[test]
    fn timeout_converts_seconds() {
        let config = Config {
            database_path: "db.sqlite".into(),
            upload_dir: "uploads".into(),
            server_host: DEFAULT_SERVER_HOST.into(),
            server_port: DEFAULT_SERVER_PORT,
            summarization_provider: SummarizationProvider::Extractive,
            ollama_url: DEFAULT_OLLAMA_URL.into(),
            bart_model: DEFAULT_BART_MODEL.into(),
            t5_model: DEFAULT_T5_MODEL.into(),
            summarization_timeout_secs: 7,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        };
        assert_eq!(config.summarization_timeout(), Duration::from_secs(7));
    }
}
