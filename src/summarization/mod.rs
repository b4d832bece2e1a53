//! Summarization backends and the registry that names them.
//!
//! A backend turns text into a shorter text within the [`LengthBounds`] chosen by the pipeline.
//! Backends must not sample: identical input on the same backend yields the same summary.
//! The Ollama backend issues HTTP requests directly to the runtime; the extractive backend runs
//! in-process and is used when no model runtime is configured.

mod extractive;
mod ollama;
pub mod registry;

use async_trait::async_trait;
use thiserror::Error;

use crate::processing::LengthBounds;

pub use extractive::ExtractiveBackend;
pub use ollama::OllamaBackend;
pub use registry::{BackendRegistry, DEFAULT_BACKEND, LIGHTWEIGHT_BACKEND, ResolvedBackend};

/// Errors surfaced by a summarization backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend runtime could not be reached.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Backend returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Backend response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
    /// Backend produced no text.
    #[error("Summarization backend returned an empty summary")]
    EmptySummary,
}

/// A named summarization capability.
#[async_trait]
pub trait SummarizationBackend: Send + Sync {
    /// Identifier of the underlying model, for diagnostics.
    fn model(&self) -> &str;

    /// Summarize `text` deterministically within `bounds`.
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, BackendError>;
}
