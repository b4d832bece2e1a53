use async_trait::async_trait;

use super::{BackendError, SummarizationBackend};
use crate::processing::LengthBounds;

/// Lead-sentence summarizer that runs in-process.
///
/// Takes sentences from the start of the text until the word budget is reached, truncating the
/// last one when a single sentence would overshoot `max_length`.
pub struct ExtractiveBackend {
    model: String,
}

impl ExtractiveBackend {
    /// Create an extractive backend reporting `model` as its identifier.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait]
impl SummarizationBackend for ExtractiveBackend {
    fn model(&self) -> &str {
        &self.model
    }

    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, BackendError> {
        let summary = build_extractive_summary(text, bounds);
        if summary.is_empty() {
            return Err(BackendError::EmptySummary);
        }
        Ok(summary)
    }
}

fn build_extractive_summary(text: &str, bounds: LengthBounds) -> String {
    let mut words: Vec<&str> = Vec::new();

    for sentence in split_sentences(text) {
        let sentence_words: Vec<&str> = sentence.split_whitespace().collect();
        if sentence_words.is_empty() {
            continue;
        }
        if words.len() >= bounds.min_length
            && words.len() + sentence_words.len() > bounds.max_length
        {
            break;
        }
        let room = bounds.max_length - words.len();
        words.extend(sentence_words.into_iter().take(room));
        if words.len() >= bounds.max_length {
            break;
        }
    }

    words.join(" ")
}

/// Split on sentence terminators, keeping the terminator with its sentence.
fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_words(text: &str) -> usize {
        text.split_whitespace().count()
    }

    const BOUNDS: LengthBounds = LengthBounds {
        max_length: 50,
        min_length: 30,
    };

    fn sentence(words: usize, tag: &str) -> String {
        let mut body = vec![tag; words].join(" ");
        body.push('.');
        body
    }

    #[test]
    fn stops_at_sentence_boundary_once_minimum_met() {
        let text = format!(
            "{} {} {}",
            sentence(20, "alpha"),
            sentence(15, "beta"),
            sentence(20, "gamma")
        );
        let summary = build_extractive_summary(&text, BOUNDS);
        assert_eq!(count_words(&summary), 35);
        assert!(summary.ends_with("beta."));
        assert!(!summary.contains("gamma"));
    }

    #[test]
    fn truncates_oversized_sentence_to_budget() {
        let text = sentence(200, "word");
        let summary = build_extractive_summary(&text, BOUNDS);
        assert_eq!(count_words(&summary), BOUNDS.max_length);
    }

    #[tokio::test]
    async fn is_deterministic() {
        let backend = ExtractiveBackend::new("lead-3");
        let text = "One sentence here. Another sentence there! A question?";
        let first = backend.summarize(text, BOUNDS).await.expect("summary");
        let second = backend.summarize(text, BOUNDS).await.expect("summary");
        assert_eq!(first, second);
        assert_eq!(first, text);
    }

    #[tokio::test]
    async fn whitespace_only_input_is_empty_summary() {
        let backend = ExtractiveBackend::new("lead-3");
        let error = backend.summarize(" \n\t ", BOUNDS).await.expect_err("empty");
        assert!(matches!(error, BackendError::EmptySummary));
    }
}
