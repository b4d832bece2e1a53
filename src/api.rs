//! HTTP surface for Textbrief.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /`: Liveness banner.
//! - `POST /summarize`: Summarize inline text (`application/json` body `{ "text", "model" }`) or
//!   an uploaded document (multipart form with a `file` part and optional `model` field). Returns
//!   `{ "summary", "model" }`.
//! - `GET /history`: Every stored summary, newest first.
//! - `DELETE /delete/{id}`: Remove one stored summary; unknown ids succeed.
//! - `POST|DELETE /clear`: Remove every stored summary.
//! - `GET /metrics`: Pipeline counters.
//!
//! Failures are reported as `{ "error", "details"? }`: caller mistakes use 400 with a specific
//! message, everything else is a 500 `"Server error"` carrying the underlying error text.

use crate::history::SummaryRecord;
use crate::metrics::MetricsSnapshot;
use crate::processing::{PipelineError, SummarizationApi, SummarizeRequest, UploadedFile};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Request, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>, max_body_bytes: usize) -> Router
where
    S: SummarizationApi + 'static,
{
    Router::new()
        .route("/", get(home))
        .route("/summarize", post(summarize::<S>))
        .route("/history", get(list_history::<S>))
        .route("/delete/:id", delete(delete_record::<S>))
        .route(
            "/clear",
            post(clear_history::<S>).delete(clear_history::<S>),
        )
        .route("/metrics", get(get_metrics::<S>))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn home() -> &'static str {
    "Textbrief backend is running"
}

/// JSON body for `POST /summarize`.
#[derive(Deserialize)]
struct SummarizeBody {
    /// Text to summarize; a missing field is treated as empty text.
    #[serde(default)]
    text: String,
    /// Optional backend name (`bart` or `t5`).
    #[serde(default)]
    model: Option<String>,
}

/// Success response for `POST /summarize`.
#[derive(Serialize)]
struct SummarizeResponse {
    summary: String,
    model: String,
}

/// Summarize inline JSON text or a multipart upload.
async fn summarize<S>(
    State(service): State<Arc<S>>,
    request: Request,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: SummarizationApi,
{
    let summarize_request = if is_json(request.headers()) {
        let Json(body) = Json::<SummarizeBody>::from_request(request, &())
            .await
            .map_err(|rejection| AppError::BadRequest {
                error: "Invalid JSON body",
                details: rejection.body_text(),
            })?;
        SummarizeRequest::text(body.text, body.model)
    } else {
        match Multipart::from_request(request, &()).await {
            Ok(multipart) => read_upload(multipart).await?,
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Request is neither JSON nor multipart");
                SummarizeRequest::upload(None, None)
            }
        }
    };

    let outcome = service.summarize(summarize_request).await?;
    tracing::info!(
        model = %outcome.model,
        record_id = ?outcome.record_id,
        summary_chars = outcome.summary.len(),
        "Summarize request completed"
    );
    Ok(Json(SummarizeResponse {
        summary: outcome.summary,
        model: outcome.model,
    }))
}

/// Collect the `file` part and `model` field from a multipart form.
async fn read_upload(mut multipart: Multipart) -> Result<SummarizeRequest, AppError> {
    let mut file = None;
    let mut model = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                // A part without a filename is a plain form value, not an upload.
                let Some(filename) = field.file_name().map(str::to_owned) else {
                    continue;
                };
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            Some("model") => {
                model = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(SummarizeRequest::upload(file, model))
}

fn multipart_error(error: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest {
        error: "Invalid multipart body",
        details: error.body_text(),
    }
}

/// `application/json` or any `application/*+json` media type.
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Every stored summary, newest first.
async fn list_history<S>(
    State(service): State<Arc<S>>,
) -> Result<Json<Vec<SummaryRecord>>, AppError>
where
    S: SummarizationApi,
{
    Ok(Json(service.history().await?))
}

/// Response body for the delete and clear endpoints.
#[derive(Serialize)]
struct MessageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    msg: Option<&'static str>,
    message: &'static str,
}

/// Remove one stored summary. Unknown ids are not an error.
async fn delete_record<S>(
    State(service): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError>
where
    S: SummarizationApi,
{
    let id: i64 = id.parse().map_err(|_| AppError::BadRequest {
        error: "Invalid id",
        details: format!("'{id}' is not an integer id"),
    })?;
    service.delete_record(id).await?;
    Ok(Json(MessageResponse {
        msg: None,
        message: "Deleted",
    }))
}

/// Remove every stored summary.
async fn clear_history<S>(State(service): State<Arc<S>>) -> Result<Json<MessageResponse>, AppError>
where
    S: SummarizationApi,
{
    service.clear_history().await?;
    Ok(Json(MessageResponse {
        msg: Some("Cleared"),
        message: "Cleared",
    }))
}

/// Return pipeline counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: SummarizationApi,
{
    Json(service.metrics_snapshot())
}

/// Error payload shared by every endpoint.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

enum AppError {
    Pipeline(PipelineError),
    /// Request body or path could not be decoded; always a 400.
    BadRequest {
        error: &'static str,
        details: String,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest { error, details } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: error.into(),
                    details: Some(details),
                },
            ),
            Self::Pipeline(error) => match client_message(&error) {
                Some(message) => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: message.into(),
                        details: None,
                    },
                ),
                None => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Server error".into(),
                        details: Some(error.to_string()),
                    },
                ),
            },
        };
        (status, Json(body)).into_response()
    }
}

fn client_message(error: &PipelineError) -> Option<&'static str> {
    match error {
        PipelineError::NoFileProvided => Some("No file uploaded"),
        PipelineError::EmptyFilename => Some("Empty file"),
        PipelineError::UnsupportedFileType(_) => Some("Unsupported file type"),
        PipelineError::NoTextFound => Some("No text found in file"),
        _ => None,
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        Self::Pipeline(inner)
    }
}
