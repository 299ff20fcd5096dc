mod app;

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};

use gamevault_core::{
    config::{self, AppConfig},
    FileStore, RecordStore,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let storage = FileStore::new(&config.data_dir);
    let mut store = RecordStore::open_with_config(storage, &config)
        .with_context(|| format!("failed to open catalog in {}", config.data_dir.display()))?;
    if config.seed_samples && store.seed_samples_if_empty()? {
        tracing::info!("Starter catalog installed");
    }

    let mut app = app::GameVaultApp::new(store);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("gamevault.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the alternate screen, so only the file sink is installed.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
