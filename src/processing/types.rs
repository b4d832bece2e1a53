//! Request, outcome, and error types for the summarization pipeline.

use std::time::Duration;

use thiserror::Error;

use crate::extract::ExtractError;
use crate::history::HistoryError;
use crate::summarization::BackendError;

/// Errors emitted by the summarization pipeline.
///
/// The first four variants are caller mistakes; everything else is a server-side failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Upload request carried no file part.
    #[error("No file uploaded")]
    NoFileProvided,
    /// Upload carried a file part with an empty (or unusable) filename.
    #[error("Empty file")]
    EmptyFilename,
    /// Upload filename does not end in a supported suffix.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    /// Input resolved to empty or whitespace-only text.
    #[error("No text found in file")]
    NoTextFound,
    /// Document bytes could not be turned into text.
    #[error(transparent)]
    Extraction(ExtractError),
    /// Upload could not be written to or read from the upload directory.
    #[error("Failed to store upload: {0}")]
    Upload(#[source] std::io::Error),
    /// Backend failed to produce a summary.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// Backend did not answer in time.
    #[error("Summarization timed out after {}s", .0.as_secs())]
    BackendTimeout(Duration),
    /// History storage failed.
    #[error("History storage failed: {0}")]
    Storage(#[from] HistoryError),
    /// A blocking worker task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),
}

impl PipelineError {
    /// Whether the failure is attributable to the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NoFileProvided
                | Self::EmptyFilename
                | Self::UnsupportedFileType(_)
                | Self::NoTextFound
        )
    }
}

impl From<ExtractError> for PipelineError {
    fn from(error: ExtractError) -> Self {
        match error {
            ExtractError::UnsupportedFileType(name) => Self::UnsupportedFileType(name),
            other => Self::Extraction(other),
        }
    }
}

/// A document received through a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as declared by the client, unsanitized.
    pub filename: String,
    /// Raw document bytes.
    pub bytes: Vec<u8>,
}

/// Where the text to summarize comes from.
#[derive(Debug, Clone)]
pub enum SummarizeInput {
    /// Text submitted inline.
    Text(String),
    /// Uploaded document; `None` when the request carried no file part.
    Upload(Option<UploadedFile>),
}

/// A single summarization request.
#[derive(Debug, Clone)]
pub struct SummarizeRequest {
    /// Source of the text.
    pub input: SummarizeInput,
    /// Requested backend name; unknown or absent names use the default backend.
    pub model: Option<String>,
}

impl SummarizeRequest {
    /// Request a summary of inline text.
    pub fn text(text: impl Into<String>, model: Option<String>) -> Self {
        Self {
            input: SummarizeInput::Text(text.into()),
            model,
        }
    }

    /// Request a summary of an uploaded document.
    pub fn upload(file: Option<UploadedFile>, model: Option<String>) -> Self {
        Self {
            input: SummarizeInput::Upload(file),
            model,
        }
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    /// Summary text returned by the backend.
    pub summary: String,
    /// Registered name of the backend that produced it.
    pub model: String,
    /// History record id, or `None` when the record could not be persisted.
    pub record_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_are_client_errors() {
        assert!(PipelineError::NoFileProvided.is_client_error());
        assert!(PipelineError::EmptyFilename.is_client_error());
        assert!(PipelineError::UnsupportedFileType("a.rtf".into()).is_client_error());
        assert!(PipelineError::NoTextFound.is_client_error());
        assert!(!PipelineError::Backend(BackendError::EmptySummary).is_client_error());
        assert!(!PipelineError::BackendTimeout(Duration::from_secs(1)).is_client_error());
    }

    #[test]
    fn unsupported_extraction_maps_to_client_error() {
        let error = PipelineError::from(ExtractError::UnsupportedFileType("x.rtf".into()));
        assert!(matches!(error, PipelineError::UnsupportedFileType(ref n) if n == "x.rtf"));

        let error = PipelineError::from(ExtractError::Pdf("broken xref".into()));
        assert!(matches!(error, PipelineError::Extraction(_)));
        assert_eq!(error.to_string(), "Failed to read PDF: broken xref");
    }

    #[test]
    fn timeout_message_reports_seconds() {
        let error = PipelineError::BackendTimeout(Duration::from_secs(120));
        assert_eq!(error.to_string(), "Summarization timed out after 120s");
    }
}
