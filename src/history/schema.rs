//! Versioned schema for the history database, tracked with `PRAGMA user_version`.

use rusqlite::Connection;

use super::HistoryError;

/// Ordered migrations; position + 1 is the schema version.
const MIGRATIONS: &[(&str, &str)] = &[(
    "v001_summaries",
    "CREATE TABLE IF NOT EXISTS summaries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text TEXT NOT NULL,
        summary TEXT NOT NULL,
        model TEXT NOT NULL
    );",
)];

/// Apply every migration newer than the database's recorded version.
pub(super) fn migrate(conn: &mut Connection) -> Result<(), HistoryError> {
    let current: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    for (idx, (name, sql)) in MIGRATIONS.iter().enumerate() {
        let version = (idx + 1) as i64;
        if version <= current {
            continue;
        }
        tracing::info!(version, name, "Running history migration");
        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| HistoryError::Migration(format!("{name}: {e}")))?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
    }

    Ok(())
}

/// Latest schema version known to this build.
pub(super) fn target_version() -> i64 {
    MIGRATIONS.len() as i64
}
