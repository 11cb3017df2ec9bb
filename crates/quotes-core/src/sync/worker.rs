use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::CoreConfig;
use crate::error::QuoteError;
use crate::models::QuoteRecord;
use crate::remote::{fetch_remote, NewPost, RemoteSource};
use crate::sync::status::{SharedSyncStats, SyncOutcome, SyncStats, SyncStatus};

/// Requests accepted by the running worker
#[derive(Debug, Clone)]
pub enum SyncCommand {
    /// Fetch immediately and restart the timer
    FetchNow,
    /// Send a local quote outward, fire-and-forget
    Push(QuoteRecord),
}

/// Results the worker reports back to the owner of the store
#[derive(Debug, Clone)]
pub enum SyncUpdate {
    Fetched { quotes: Vec<QuoteRecord> },
    FetchFailed { error: QuoteError },
    Pushed { text: String, response: serde_json::Value },
    PushFailed { text: String, error: QuoteError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub interval: Duration,
    pub page_size: usize,
}

impl SyncSettings {
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            page_size: config.page_size,
        }
    }
}

/// Cheap, cloneable access to a running worker
#[derive(Clone)]
pub struct SyncClient {
    command_tx: mpsc::UnboundedSender<SyncCommand>,
    status_rx: watch::Receiver<SyncStatus>,
    stats: SharedSyncStats,
}

impl SyncClient {
    /// Returns false if the worker has stopped
    pub fn request_refresh(&self) -> bool {
        self.command_tx.send(SyncCommand::FetchNow).is_ok()
    }

    /// Returns false if the worker has stopped
    pub fn push(&self, quote: QuoteRecord) -> bool {
        self.command_tx.send(SyncCommand::Push(quote)).is_ok()
    }

    pub fn status(&self) -> SyncStatus {
        self.status_rx.borrow().clone()
    }

    pub fn watch_status(&self) -> watch::Receiver<SyncStatus> {
        self.status_rx.clone()
    }

    pub fn stats(&self) -> SyncStats {
        self.stats.snapshot()
    }
}

/// Owner of the periodic sync task.
///
/// The first tick fires immediately, so a fetch runs as soon as the worker
/// starts. Dropping the worker cancels the timer; `stop` also waits for the
/// task to exit. Push tasks already in flight are left to finish.
pub struct SyncWorker {
    client: SyncClient,
    cancel_tx: watch::Sender<bool>,
    update_rx: Option<mpsc::UnboundedReceiver<SyncUpdate>>,
    task: Option<JoinHandle<()>>,
}

impl SyncWorker {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn(source: Arc<dyn RemoteSource>, settings: SyncSettings) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SyncStatus::default());
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let stats = SharedSyncStats::new();

        let task = tokio::spawn(run_sync_loop(
            source,
            settings,
            command_rx,
            update_tx,
            status_tx,
            cancel_rx,
            stats.clone(),
        ));

        Self {
            client: SyncClient {
                command_tx,
                status_rx,
                stats,
            },
            cancel_tx,
            update_rx: Some(update_rx),
            task: Some(task),
        }
    }

    pub fn client(&self) -> SyncClient {
        self.client.clone()
    }

    /// Hand the update stream to whoever owns the store. Only the first call gets it.
    pub fn take_updates(&mut self) -> Option<mpsc::UnboundedReceiver<SyncUpdate>> {
        self.update_rx.take()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the timer and wait for the loop to exit. A fetch already in
    /// flight completes first; its update stays queued for `take_updates`.
    pub async fn stop(&mut self) {
        let _ = self.cancel_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Sync worker ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        let _ = self.cancel_tx.send(true);
    }
}

async fn run_sync_loop(
    source: Arc<dyn RemoteSource>,
    settings: SyncSettings,
    mut command_rx: mpsc::UnboundedReceiver<SyncCommand>,
    update_tx: mpsc::UnboundedSender<SyncUpdate>,
    status_tx: watch::Sender<SyncStatus>,
    mut cancel_rx: watch::Receiver<bool>,
    stats: SharedSyncStats,
) {
    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        "Sync worker started (every {}s, page size {})",
        settings.interval.as_secs(),
        settings.page_size
    );

    loop {
        if *cancel_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = cancel_rx.changed() => {
                if changed.is_err() || *cancel_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                fetch_cycle(source.as_ref(), settings.page_size, &update_tx, &status_tx, &stats).await;
            }
            command = command_rx.recv() => match command {
                Some(SyncCommand::FetchNow) => {
                    fetch_cycle(source.as_ref(), settings.page_size, &update_tx, &status_tx, &stats).await;
                    ticker.reset();
                }
                Some(SyncCommand::Push(quote)) => {
                    spawn_push(source.clone(), quote, update_tx.clone(), stats.clone());
                }
                None => break,
            },
        }
    }

    tracing::info!("Sync worker stopped");
}

/// One Idle -> Fetching -> outcome -> Idle pass. The store is never touched
/// here; a successful page travels to the owner as `SyncUpdate::Fetched`.
/// A fetch in flight is never cancelled: `stop` waits for it and its update
/// is still sent.
async fn fetch_cycle(
    source: &dyn RemoteSource,
    page_size: usize,
    update_tx: &mpsc::UnboundedSender<SyncUpdate>,
    status_tx: &watch::Sender<SyncStatus>,
    stats: &SharedSyncStats,
) {
    let fetching = status_tx.borrow().fetching();
    status_tx.send_replace(fetching);

    let (outcome, update) = match fetch_remote(source, page_size).await {
        Ok(quotes) => {
            tracing::info!("Fetched {} quotes from remote", quotes.len());
            (
                SyncOutcome::Success {
                    fetched: quotes.len(),
                    at: Utc::now(),
                },
                SyncUpdate::Fetched { quotes },
            )
        }
        Err(error) => {
            tracing::warn!("Remote fetch failed: {}", error);
            (
                SyncOutcome::Failure {
                    message: error.to_string(),
                    at: Utc::now(),
                },
                SyncUpdate::FetchFailed { error },
            )
        }
    };

    stats.record_cycle(&outcome);
    // Status settles before the update is visible to the owner
    status_tx.send_replace(SyncStatus::finished(outcome));
    let _ = update_tx.send(update);
}

fn spawn_push(
    source: Arc<dyn RemoteSource>,
    quote: QuoteRecord,
    update_tx: mpsc::UnboundedSender<SyncUpdate>,
    stats: SharedSyncStats,
) {
    tokio::spawn(async move {
        let post = NewPost::from(&quote);
        let update = match source.push(&post).await {
            Ok(response) => {
                tracing::info!("Pushed quote to remote: {}", response);
                stats.record_push(true);
                SyncUpdate::Pushed {
                    text: quote.text,
                    response,
                }
            }
            Err(error) => {
                tracing::warn!("Failed to push quote '{}': {}", quote.text, error);
                stats.record_push(false);
                SyncUpdate::PushFailed {
                    text: quote.text,
                    error,
                }
            }
        };
        let _ = update_tx.send(update);
    });
}
