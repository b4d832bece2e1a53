//! Immutable name → backend map built once at startup.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{BackendError, ExtractiveBackend, OllamaBackend, SummarizationBackend};
use crate::config::{Config, SummarizationProvider};

/// Name of the high-quality backend, used whenever a request names nothing we know.
pub const DEFAULT_BACKEND: &str = "bart";
/// Name of the lightweight alternative backend.
pub const LIGHTWEIGHT_BACKEND: &str = "t5";

/// Backend chosen for a request, together with the name it is registered under.
#[derive(Clone)]
pub struct ResolvedBackend {
    /// Registered name; this is what gets reported and persisted.
    pub name: String,
    /// Shared handle to the backend.
    pub backend: Arc<dyn SummarizationBackend>,
}

/// Registered summarization backends with a guaranteed default.
pub struct BackendRegistry {
    backends: BTreeMap<String, Arc<dyn SummarizationBackend>>,
    default_name: String,
}

impl BackendRegistry {
    /// Create a registry whose fallback is `default_backend` registered as `default_name`.
    pub fn new(default_name: impl Into<String>, default_backend: Arc<dyn SummarizationBackend>) -> Self {
        let default_name = default_name.into();
        let mut backends = BTreeMap::new();
        backends.insert(default_name.clone(), default_backend);
        Self {
            backends,
            default_name,
        }
    }

    /// Register an additional backend. Re-using a name replaces the earlier entry.
    pub fn with_backend(
        mut self,
        name: impl Into<String>,
        backend: Arc<dyn SummarizationBackend>,
    ) -> Self {
        self.backends.insert(name.into(), backend);
        self
    }

    /// Build the `bart`/`t5` pair for the configured provider.
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        let (default, lightweight): (Arc<dyn SummarizationBackend>, Arc<dyn SummarizationBackend>) =
            match config.summarization_provider {
                SummarizationProvider::Ollama => (
                    Arc::new(OllamaBackend::new(&config.ollama_url, &config.bart_model)?),
                    Arc::new(OllamaBackend::new(&config.ollama_url, &config.t5_model)?),
                ),
                SummarizationProvider::Extractive => (
                    Arc::new(ExtractiveBackend::new("extractive-lead")),
                    Arc::new(ExtractiveBackend::new("extractive-lead")),
                ),
            };

        let registry =
            Self::new(DEFAULT_BACKEND, default).with_backend(LIGHTWEIGHT_BACKEND, lightweight);
        for (name, backend) in &registry.backends {
            tracing::info!(name = %name, model = backend.model(), "Registered summarization backend");
        }
        Ok(registry)
    }

    /// Look up a backend by name, falling back to the default for absent, blank, or unknown names.
    pub fn resolve(&self, name: Option<&str>) -> ResolvedBackend {
        let requested = name.map(str::trim).filter(|value| !value.is_empty());
        if let Some((name, backend)) =
            requested.and_then(|value| self.backends.get_key_value(value))
        {
            return ResolvedBackend {
                name: name.clone(),
                backend: Arc::clone(backend),
            };
        }

        if let Some(value) = requested {
            tracing::debug!(requested = value, fallback = %self.default_name, "Unknown backend; using default");
        }
        ResolvedBackend {
            name: self.default_name.clone(),
            backend: Arc::clone(&self.backends[&self.default_name]),
        }
    }
}
