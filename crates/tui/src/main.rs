mod app;
mod banner;

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

use apexdraft_core::{
    config::{self, AppConfig},
    DraftStore, FileStore, OpenF1Client,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let storage = FileStore::new(&config.storage_root);
    let store = DraftStore::restore(storage).with_commit_mode(config.commit_mode);
    info!(root = %config.storage_root.display(), "Using draft storage");

    let client = OpenF1Client::new(&config)?;
    let mut app = app::DraftApp::new(client, store);
    app.run().await
}

/// File-only logging; stdout belongs to the terminal UI.
fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("apexdraft.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || open_log_writer(&log_path));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}

/// Append handle for the log file, or a sink when it cannot be opened.
fn open_log_writer(path: &Path) -> Box<dyn Write + Send> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Box::new(file),
        Err(_) => Box::new(io::sink()),
    }
}
