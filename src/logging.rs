//! Tracing setup for the Textbrief server.
//!
//! Request handling, pipeline stages and history writes emit structured `tracing` events
//! (model, word count, length bounds, record id). They are printed to stdout and copied to a
//! log file: `TEXTBRIEF_LOG_FILE` when set, `logs/textbrief.log` otherwise.
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_ENV: &str = "TEXTBRIEF_LOG_FILE";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "textbrief.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber.
///
/// `RUST_LOG` controls filtering and defaults to `info`. When the log file cannot be opened the
/// server keeps running with stdout logging only.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();
    let file_layer = open_log_file().map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

fn open_log_file() -> Option<NonBlocking> {
    let (writer, guard) = match std::env::var(LOG_FILE_ENV) {
        Ok(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|err| eprintln!("Failed to open log file {path}: {err}"))
                .ok()?;
            tracing_appender::non_blocking(file)
        }
        Err(_) => {
            let dir = PathBuf::from(DEFAULT_LOG_DIR);
            std::fs::create_dir_all(&dir)
                .map_err(|err| eprintln!("Failed to create {}: {err}", dir.display()))
                .ok()?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, DEFAULT_LOG_FILE))
        }
    };
    // The guard flushes buffered lines on drop, so it lives for the whole process.
    let _ = LOG_GUARD.set(guard);
    Some(writer)
}
