//! Summarization pipeline: input resolution, validation, length policy, invocation, persistence.

pub mod length;
mod service;
pub mod types;

pub use length::{LengthBounds, compute_max_length, count_words};
pub use service::{SummarizationApi, SummarizationService};
pub use types::{
    PipelineError, SummarizeInput, SummarizeRequest, SummaryOutcome, UploadedFile,
};
