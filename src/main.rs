use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use textbrief::{api, config, logging, processing::SummarizationService};
use tokio::net::TcpListener;

/// Summarize text and documents over HTTP.
#[derive(Parser, Debug)]
#[command(name = "textbrief", version, about)]
struct Cli {
    /// Port to listen on (overrides SERVER_PORT).
    #[arg(long)]
    port: Option<u16>,
    /// SQLite history file (overrides DATABASE_PATH).
    #[arg(long)]
    database: Option<PathBuf>,
    /// Directory for uploaded documents (overrides UPLOAD_DIR).
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::init_config(|config| {
        if let Some(port) = cli.port {
            config.server_port = port;
        }
        if let Some(database) = cli.database {
            config.database_path = database;
        }
        if let Some(upload_dir) = cli.upload_dir {
            config.upload_dir = upload_dir;
        }
    })
    .context("failed to load configuration")?;
    logging::init_tracing();

    let service = SummarizationService::from_config(config)?;
    let app = api::create_router(Arc::new(service), config.max_upload_bytes);

    let address = (config.server_host.as_str(), config.server_port);
    let listener = TcpListener::bind(address).await.with_context(|| {
        format!(
            "failed to bind {}:{}",
            config.server_host, config.server_port
        )
    })?;
    tracing::info!(
        "Listening on http://{}",
        listener.local_addr().context("listener has no local address")?
    );
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated")?;
    Ok(())
}
