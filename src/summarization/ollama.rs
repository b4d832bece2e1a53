use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{BackendError, SummarizationBackend};
use crate::processing::LengthBounds;

/// Fixed seed so repeated requests decode identically.
const SAMPLING_SEED: u64 = 42;

/// Backend that delegates to a model served by a local Ollama runtime.
pub struct OllamaBackend {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    /// Build a backend for `model` served at `base_url`.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, BackendError> {
        let http = Client::builder()
            .user_agent("textbrief/summary")
            .build()
            .map_err(|error| {
                BackendError::ProviderUnavailable(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

pub(super) fn build_prompt(text: &str, bounds: LengthBounds) -> String {
    format!(
        "System: You write faithful, neutral summaries. Do not add facts that are not in the text. \
         Write between {min} and {max} words as a single paragraph and output only the summary.\n\n\
         Text:\n{text}\n\nSummary:",
        min = bounds.min_length,
        max = bounds.max_length,
    )
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl SummarizationBackend for OllamaBackend {
    fn model(&self) -> &str {
        &self.model
    }

    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, BackendError> {
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(text, bounds),
            "stream": false,
            "options": {
                // Greedy decoding: no sampling.
                "temperature": 0.0,
                "top_k": 1,
                "seed": SAMPLING_SEED,
                "num_predict": bounds.token_budget(),
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                BackendError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404: {body}",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            BackendError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(BackendError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        let summary = body.response.trim();
        if summary.is_empty() {
            return Err(BackendError::EmptySummary);
        }
        Ok(summary.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    const BOUNDS: LengthBounds = LengthBounds {
        max_length: 80,
        min_length: 30,
    };

    #[tokio::test]
    async fn sends_deterministic_options_and_returns_trimmed_summary() {
        let server = MockServer::start_async().await;
        let backend = OllamaBackend::new(server.base_url(), "llama3.1:8b").expect("backend");

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body_partial(
                        r#"{"model":"llama3.1:8b","stream":false,"options":{"temperature":0.0,"top_k":1}}"#,
                    );
                then.status(200).json_body(json!({
                    "response": "  Summary text \n",
                    "done": true
                }));
            })
            .await;

        let summary = backend
            .summarize("Some long input", BOUNDS)
            .await
            .expect("summary");

        mock.assert_async().await;
        assert_eq!(summary, "Summary text");
    }

    #[tokio::test]
    async fn error_status_is_generation_failure() {
        let server = MockServer::start_async().await;
        let backend = OllamaBackend::new(server.base_url(), "llama3.1:8b").expect("backend");

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("boom");
            })
            .await;

        let error = backend
            .summarize("Some long input", BOUNDS)
            .await
            .expect_err("error response");

        assert!(
            matches!(error, BackendError::GenerationFailed(ref message) if message.contains("500"))
        );
    }

    #[tokio::test]
    async fn blank_response_is_rejected() {
        let server = MockServer::start_async().await;
        let backend = OllamaBackend::new(server.base_url(), "llama3.2:1b").expect("backend");

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({ "response": "   ", "done": true }));
            })
            .await;

        let error = backend
            .summarize("Some long input", BOUNDS)
            .await
            .expect_err("empty summary");
        assert!(matches!(error, BackendError::EmptySummary));
    }

    #[test]
    fn prompt_carries_bounds_and_text() {
        let prompt = build_prompt("The quick brown fox.", BOUNDS);
        assert!(prompt.contains("between 30 and 80 words"));
        assert!(prompt.contains("The quick brown fox."));
    }
}
