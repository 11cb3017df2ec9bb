use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use quotes_core::remote::{HttpRemoteSource, RemoteSource};
use quotes_core::store::{FileKvStore, KeyValueStore, LoadOutcome, MemoryKvStore};
use quotes_core::{CoreConfig, QuoteApp};

/// Global flags shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub remote_url: Option<String>,
    /// Keep everything in memory; nothing is read from or written to disk
    pub ephemeral: bool,
}

impl CliOptions {
    /// Config file (if any) with command-line overrides applied on top
    pub fn resolve_config(&self) -> Result<CoreConfig> {
        let mut config = match &self.config {
            Some(path) => CoreConfig::load(path)?,
            None => CoreConfig::default(),
        };
        if let Some(ref data_dir) = self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(ref remote_url) = self.remote_url {
            config.remote_url = remote_url.clone();
        }
        Ok(config)
    }

    pub fn open_storage(&self, config: &CoreConfig) -> Result<Arc<dyn KeyValueStore>> {
        if self.ephemeral {
            return Ok(Arc::new(MemoryKvStore::new()));
        }
        let store = FileKvStore::open(&config.data_dir).with_context(|| {
            format!("Failed to open storage in {}", config.data_dir.display())
        })?;
        Ok(Arc::new(store))
    }
}

/// App hydrated from `kv`, with a warning when persisted quotes were unreadable
pub fn open_app(kv: Arc<dyn KeyValueStore>, config: &CoreConfig) -> QuoteApp {
    let mut app = QuoteApp::new(kv);
    if let LoadOutcome::Corrupt(reason) = app.hydrate() {
        tracing::warn!("Using built-in quotes: {}", reason);
    }
    app.set_push_enabled(config.push_enabled);
    app
}

pub fn remote_source(config: &CoreConfig) -> Result<Arc<dyn RemoteSource>> {
    let source = HttpRemoteSource::with_timeout(&config.remote_url, config.request_timeout())
        .context("Failed to build HTTP client")?;
    Ok(Arc::new(source))
}
