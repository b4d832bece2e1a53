//! Durable log of completed summarizations.

mod error;
mod schema;
mod store;
mod types;

pub use error::HistoryError;
pub use store::{HistoryStore, SqliteHistoryStore};
pub use types::SummaryRecord;
