// clubdues: terminal dashboard for club dues.
// Wires configuration, logging, the status cache and the backend client into the TUI.

mod app;
mod backend;
mod cache;
mod config;
mod error;
mod metrics;
mod period;
mod report;
mod service;
mod state;
mod ui;

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::backend::BackendClient;
use crate::cache::{FileSnapshot, NoSnapshot, StatusCache, paths};
use crate::config::Config;
use crate::error::Result;
use crate::service::PaymentStatusService;

/// Log to a file in the cache dir; stdout is owned by the TUI.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,clubdues=info"));

    let file = paths::log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

fn open_cache(config: &Config) -> StatusCache {
    let cache = match &config.snapshot_path {
        Some(path) => {
            let store = FileSnapshot::new(path);
            tracing::debug!(path = %store.path().display(), "status cache snapshot");
            StatusCache::open(store, config.windows)
        }
        None => {
            tracing::warn!("no cache directory available, status cache is memory-only");
            StatusCache::open(NoSnapshot, config.windows)
        }
    };

    if cache.is_empty() {
        tracing::info!("status cache starts cold");
    } else {
        tracing::info!(entries = cache.len(), "status cache restored");
    }
    cache
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::load()?;
    tracing::info!(period = %config.period, url = %config.backend_url, "starting clubdues");

    let client = BackendClient::from_config(&config)?;
    let service = PaymentStatusService::new(open_cache(&config));
    let mut app = App::new(&config, client, service);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    if let Err(e) = &result {
        tracing::error!(error = %e, "clubdues exited with error");
    }
    result
}
