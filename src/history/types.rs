use serde::Serialize;

/// One completed summarization as stored in the history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    /// Store-assigned identifier; increases with insertion order and is never reused.
    pub id: i64,
    /// Normalized text that was summarized.
    pub text: String,
    /// Summary produced by the backend.
    pub summary: String,
    /// Registered name of the backend that produced the summary.
    pub model: String,
}
