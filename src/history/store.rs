//! History storage trait and SQLite implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior, params};

use super::HistoryError;
use super::schema;
use super::types::SummaryRecord;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Storage for summary records.
///
/// Records are append-only apart from deletion; there is deliberately no update operation.
/// `list_all` returns records newest first (descending `id`).
pub trait HistoryStore: Send + Sync {
    /// Persist a record and return its assigned id.
    fn insert(&self, text: &str, summary: &str, model: &str) -> Result<i64, HistoryError>;
    /// Every record, newest first. An empty store yields an empty vector.
    fn list_all(&self) -> Result<Vec<SummaryRecord>, HistoryError>;
    /// Remove the record with `id`, returning how many rows were removed (0 or 1).
    fn delete_by_id(&self, id: i64) -> Result<usize, HistoryError>;
    /// Remove every record, returning how many rows were removed.
    fn delete_all(&self) -> Result<usize, HistoryError>;
}

/// SQLite-backed history store.
///
/// Every operation opens its own connection and transaction; the connection is closed when the
/// operation returns, whether it committed or not. Concurrent callers are serialized by SQLite.
pub struct SqliteHistoryStore {
    path: PathBuf,
}

impl SqliteHistoryStore {
    /// Open or create the database at `path` and bring its schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self { path };
        let mut conn = store.connect()?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, "Configured history journal");
        schema::migrate(&mut conn)?;
        tracing::info!(path = %store.path.display(), "History store ready");
        Ok(store)
    }

    fn connect(&self) -> Result<Connection, HistoryError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Run `op` inside a write transaction on a fresh connection.
    ///
    /// The transaction takes the write lock up front; it commits when `op` succeeds and rolls
    /// back when dropped on error.
    fn write<T>(
        &self,
        op: impl FnOnce(&Transaction<'_>) -> Result<T, rusqlite::Error>,
    ) -> Result<T, HistoryError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = op(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn insert(&self, text: &str, summary: &str, model: &str) -> Result<i64, HistoryError> {
        self.write(|tx| {
            tx.execute(
                "INSERT INTO summaries (text, summary, model) VALUES (?1, ?2, ?3)",
                params![text, summary, model],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn list_all(&self) -> Result<Vec<SummaryRecord>, HistoryError> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT id, text, summary, model FROM summaries ORDER BY id DESC")?;
        let records = stmt
            .query_map([], |row| {
                Ok(SummaryRecord {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    summary: row.get(2)?,
                    model: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn delete_by_id(&self, id: i64) -> Result<usize, HistoryError> {
        self.write(|tx| tx.execute("DELETE FROM summaries WHERE id = ?1", params![id]))
    }

    fn delete_all(&self) -> Result<usize, HistoryError> {
        self.write(|tx| tx.execute("DELETE FROM summaries", []))
    }
}
