//! Summarization service coordinating extraction, backend invocation, and history writes.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::{
    config::Config,
    extract::{self, DocumentKind, UploadStore},
    history::{HistoryError, HistoryStore, SqliteHistoryStore, SummaryRecord},
    metrics::{MetricsSnapshot, PipelineMetrics},
    processing::{
        length::{LengthBounds, count_words},
        types::{PipelineError, SummarizeInput, SummarizeRequest, SummaryOutcome, UploadedFile},
    },
    summarization::BackendRegistry,
};

/// Runs summarization requests end to end and owns access to the history store.
///
/// The service holds the backend registry, history store, and upload directory so the HTTP
/// surface only translates requests. Construct it once near process start and share it through
/// an `Arc`.
pub struct SummarizationService {
    registry: Arc<BackendRegistry>,
    history: Arc<dyn HistoryStore>,
    uploads: UploadStore,
    backend_timeout: Duration,
    metrics: Arc<PipelineMetrics>,
}

/// Abstraction over the pipeline used by the HTTP surface.
#[async_trait]
pub trait SummarizationApi: Send + Sync {
    /// Summarize inline text or an uploaded document and record the result.
    async fn summarize(&self, request: SummarizeRequest) -> Result<SummaryOutcome, PipelineError>;

    /// Every history record, newest first.
    async fn history(&self) -> Result<Vec<SummaryRecord>, PipelineError>;

    /// Remove one history record; unknown ids are ignored.
    async fn delete_record(&self, id: i64) -> Result<(), PipelineError>;

    /// Remove every history record.
    async fn clear_history(&self) -> Result<(), PipelineError>;

    /// Current pipeline counters.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SummarizationService {
    /// Assemble a service from already constructed parts.
    pub fn new(
        registry: Arc<BackendRegistry>,
        history: Arc<dyn HistoryStore>,
        uploads: UploadStore,
        backend_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            history,
            uploads,
            backend_timeout,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Build the registry, history store, and upload directory described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let registry =
            BackendRegistry::from_config(config).context("failed to build backend registry")?;
        let history = SqliteHistoryStore::open(&config.database_path).with_context(|| {
            format!(
                "failed to open history database {}",
                config.database_path.display()
            )
        })?;
        let uploads = UploadStore::open(&config.upload_dir).with_context(|| {
            format!(
                "failed to create upload directory {}",
                config.upload_dir.display()
            )
        })?;

        Ok(Self::new(
            Arc::new(registry),
            Arc::new(history),
            uploads,
            config.summarization_timeout(),
        ))
    }

    /// Run the pipeline for one request.
    pub async fn summarize(
        &self,
        request: SummarizeRequest,
    ) -> Result<SummaryOutcome, PipelineError> {
        let result = self.run(request).await;
        match &result {
            Ok(_) => self.metrics.record_summary(),
            Err(error) if error.is_client_error() => {
                tracing::info!(error = %error, "Summarization request rejected");
                self.metrics.record_rejected();
            }
            Err(error) => {
                tracing::error!(error = %error, "Summarization request failed");
                self.metrics.record_failed();
            }
        }
        result
    }

    async fn run(&self, request: SummarizeRequest) -> Result<SummaryOutcome, PipelineError> {
        let SummarizeRequest { input, model } = request;

        let raw_text = match input {
            SummarizeInput::Text(text) => text,
            SummarizeInput::Upload(file) => {
                self.extract_upload(file.ok_or(PipelineError::NoFileProvided)?)
                    .await?
            }
        };

        let text = raw_text.trim();
        if text.is_empty() {
            return Err(PipelineError::NoTextFound);
        }
        let text = text.to_string();

        let word_count = count_words(&text);
        let bounds = LengthBounds::for_word_count(word_count);
        let resolved = self.registry.resolve(model.as_deref());
        tracing::info!(
            requested = model.as_deref().unwrap_or(""),
            model = %resolved.name,
            backend_model = resolved.backend.model(),
            word_count,
            max_length = bounds.max_length,
            min_length = bounds.min_length,
            "Summarizing text"
        );

        let summary = tokio::time::timeout(
            self.backend_timeout,
            resolved.backend.summarize(&text, bounds),
        )
        .await
        .map_err(|_| PipelineError::BackendTimeout(self.backend_timeout))??;

        let record_id = self
            .persist(text, summary.clone(), resolved.name.clone())
            .await;

        Ok(SummaryOutcome {
            summary,
            model: resolved.name,
            record_id,
        })
    }

    /// Store the upload, then dispatch on its sanitized name and extract the stored bytes.
    async fn extract_upload(&self, file: UploadedFile) -> Result<String, PipelineError> {
        let UploadedFile { filename, bytes } = file;
        let filename =
            UploadStore::sanitize_filename(&filename).ok_or(PipelineError::EmptyFilename)?;
        let uploads = self.uploads.clone();

        let text = tokio::task::spawn_blocking(move || -> Result<String, PipelineError> {
            let path = uploads
                .save(&filename, &bytes)
                .map_err(PipelineError::Upload)?;
            let kind = DocumentKind::from_filename(&filename)?;
            let stored = std::fs::read(&path).map_err(PipelineError::Upload)?;
            let text = extract::extract_text(kind, &stored)?;
            tracing::debug!(
                file = %filename,
                kind = kind.as_str(),
                chars = text.len(),
                "Extracted upload"
            );
            Ok(text)
        })
        .await
        .map_err(|error| PipelineError::Task(error.to_string()))??;

        Ok(text)
    }

    /// Write the history record. Failure is logged and counted but never fails the request.
    async fn persist(&self, text: String, summary: String, model: String) -> Option<i64> {
        match self
            .with_history(move |history| history.insert(&text, &summary, &model))
            .await
        {
            Ok(id) => {
                tracing::info!(record_id = id, "Summary recorded");
                Some(id)
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to record summary; returning it anyway");
                self.metrics.record_persistence_failure();
                None
            }
        }
    }

    async fn with_history<T, F>(&self, op: F) -> Result<T, PipelineError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn HistoryStore) -> Result<T, HistoryError> + Send + 'static,
    {
        let history = Arc::clone(&self.history);
        tokio::task::spawn_blocking(move || op(history.as_ref()))
            .await
            .map_err(|error| PipelineError::Task(error.to_string()))?
            .map_err(PipelineError::from)
    }

    /// Every history record, newest first.
    pub async fn history(&self) -> Result<Vec<SummaryRecord>, PipelineError> {
        self.with_history(|history| history.list_all()).await
    }

    /// Remove one history record; unknown ids are a no-op.
    pub async fn delete_record(&self, id: i64) -> Result<(), PipelineError> {
        let removed = self
            .with_history(move |history| history.delete_by_id(id))
            .await?;
        tracing::info!(record_id = id, removed, "Deleted history record");
        Ok(())
    }

    /// Remove every history record.
    pub async fn clear_history(&self) -> Result<(), PipelineError> {
        let removed = self.with_history(|history| history.delete_all()).await?;
        tracing::info!(removed, "Cleared history");
        Ok(())
    }

    /// Return the current pipeline counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl SummarizationApi for SummarizationService {
    async fn summarize(&self, request: SummarizeRequest) -> Result<SummaryOutcome, PipelineError> {
        SummarizationService::summarize(self, request).await
    }

    async fn history(&self) -> Result<Vec<SummaryRecord>, PipelineError> {
        SummarizationService::history(self).await
    }

    async fn delete_record(&self, id: i64) -> Result<(), PipelineError> {
        SummarizationService::delete_record(self, id).await
    }

    async fn clear_history(&self) -> Result<(), PipelineError> {
        SummarizationService::clear_history(self).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SummarizationService::metrics_snapshot(self)
    }
}
