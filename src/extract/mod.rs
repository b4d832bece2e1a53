//! Text extraction for uploaded documents.
//!
//! Uploads are dispatched once, by filename suffix, into a closed [`DocumentKind`]. Each kind has
//! a dedicated reader that turns raw bytes into text; whitespace normalization is left to the
//! caller so a document that parses to nothing can be rejected the same way as empty input.

pub(crate) mod docx;
pub(crate) mod pdf;
pub mod uploads;

use thiserror::Error;

pub use uploads::UploadStore;

/// Errors raised while turning document bytes into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Filename suffix is not one of the supported document kinds.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    /// PDF container could not be parsed.
    #[error("Failed to read PDF: {0}")]
    Pdf(String),
    /// DOCX container or its XML body could not be parsed.
    #[error("Failed to read DOCX: {0}")]
    Docx(String),
    /// Plain-text upload was not valid UTF-8.
    #[error("Text file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// UTF-8 text (`.txt`).
    PlainText,
    /// Portable Document Format (`.pdf`).
    Pdf,
    /// Office Open XML word-processing document (`.docx`).
    WordDoc,
}

impl DocumentKind {
    /// Resolve the document kind from a filename suffix.
    ///
    /// Matching is case-sensitive: `report.PDF` is rejected.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        if filename.ends_with(".pdf") {
            Ok(Self::Pdf)
        } else if filename.ends_with(".docx") {
            Ok(Self::WordDoc)
        } else if filename.ends_with(".txt") {
            Ok(Self::PlainText)
        } else {
            Err(ExtractError::UnsupportedFileType(filename.to_string()))
        }
    }

    /// Short label used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Pdf => "pdf",
            Self::WordDoc => "docx",
        }
    }
}

/// Extract the text layer of a document of the given kind.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::PlainText => Ok(String::from_utf8(bytes.to_vec())?),
        DocumentKind::Pdf => pdf::extract_pdf_text(bytes),
        DocumentKind::WordDoc => docx::extract_docx_text(bytes),
    }
}
