#![deny(missing_docs)]

//! Core library for the Textbrief summarization server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Upload storage and document text extraction.
pub mod extract;
/// SQLite-backed summary history.
pub mod history;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline metrics helpers.
pub mod metrics;
/// Summarization pipeline orchestration.
pub mod processing;
/// Summarization backends and the name registry.
pub mod summarization;
