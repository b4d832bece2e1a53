use thiserror::Error;

/// Errors raised by history storage.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// SQLite rejected an operation or could not be opened.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// The database location could not be prepared.
    #[error("Failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),
    /// A schema migration failed to apply.
    #[error("Migration failed: {0}")]
    Migration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_error_display() {
        let err = HistoryError::Migration("v001_summaries: syntax error".into());
        assert_eq!(
            err.to_string(),
            "Migration failed: v001_summaries: syntax error"
        );
    }
}
