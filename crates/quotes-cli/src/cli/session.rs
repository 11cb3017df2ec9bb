use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use quotes_core::remote::RemoteSource;
use quotes_core::sync::{SyncSettings, SyncWorker};
use quotes_core::{AppEvent, CoreConfig, QuoteApp};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::commands::{export_to, import_from};
use super::protocol::{SessionCommand, SESSION_HELP};
use super::render::print_events;

/// Interactive loop: reads commands from `input` while a background worker
/// polls the remote. Worker results are applied between commands, so the
/// app is only ever touched from this task.
pub async fn run_session<R, O, E>(
    app: &mut QuoteApp,
    config: &CoreConfig,
    source: Arc<dyn RemoteSource>,
    input: R,
    out: &mut O,
    err: &mut E,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    O: Write,
    E: Write,
{
    let mut worker = SyncWorker::spawn(source, SyncSettings::from_config(config));
    let mut updates = worker
        .take_updates()
        .context("Sync worker updates already taken")?;
    app.attach_sync(worker.client());
    tracing::info!(
        "Session started, polling {} every {}s",
        config.remote_url,
        config.poll_interval().as_secs()
    );

    print_events(out, err, &app.handle(AppEvent::Categories))?;
    print_events(out, err, &app.handle(AppEvent::ShowAnother))?;
    writeln!(out, "Type 'help' for commands.")?;
    out.flush()?;

    let mut lines = input.lines();
    let result = loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(anyhow::Error::new(e).context("Failed to read input")),
                };
                match SessionCommand::parse(&line) {
                    Ok(SessionCommand::Quit) => break Ok(()),
                    Ok(command) => {
                        if let Err(e) = dispatch(app, command, out, err).await {
                            writeln!(err, "error: {:#}", e)?;
                        }
                    }
                    Err(message) => writeln!(err, "{}", message)?,
                }
            }
            Some(update) = updates.recv() => {
                print_events(out, err, &app.apply_sync_update(update))?;
            }
        }
        out.flush()?;
    };

    app.detach_sync();
    worker.stop().await;
    // A fetch that was in flight at quit still lands in the store
    while let Ok(update) = updates.try_recv() {
        print_events(out, err, &app.apply_sync_update(update))?;
    }
    out.flush()?;
    tracing::info!("Session ended");
    result
}

async fn dispatch<O: Write, E: Write>(
    app: &mut QuoteApp,
    command: SessionCommand,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    match command {
        SessionCommand::App(event) => {
            print_events(out, err, &app.handle(event))?;
        }
        SessionCommand::Export { path } => {
            export_to(app, &path, out, err).await?;
        }
        SessionCommand::Import { path } => {
            import_from(app, &path, out, err).await?;
        }
        SessionCommand::Status => {
            let status = app
                .sync_status()
                .map(|status| status.describe())
                .unwrap_or_else(|| "sync not running".to_string());
            writeln!(out, "Sync: {}", status)?;
            writeln!(out, "Quotes: {} ({})", app.store().len(), app.filter())?;
        }
        SessionCommand::Help => writeln!(out, "{}", SESSION_HELP)?,
        SessionCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{BoxFuture, FutureExt};
    use quotes_core::error::Result as CoreResult;
    use quotes_core::remote::{NewPost, RemotePost};
    use quotes_core::store::{KeyValueStore, MemoryKvStore};
    use quotes_core::QuoteError;
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, BufReader};

    /// Serves an empty page, so a merge never changes the local list
    struct SilentSource;

    impl RemoteSource for SilentSource {
        fn fetch(&self, _limit: usize) -> BoxFuture<'_, CoreResult<Vec<RemotePost>>> {
            async { Ok(Vec::new()) }.boxed()
        }

        fn push<'a>(&'a self, _post: &'a NewPost) -> BoxFuture<'a, CoreResult<serde_json::Value>> {
            async { Err(QuoteError::Network("offline".into())) }.boxed()
        }
    }

    async fn session(script: &str, kv: Arc<MemoryKvStore>) -> (String, String) {
        let mut app = QuoteApp::open(kv);
        let mut config = CoreConfig::default();
        config.push_enabled = false;
        app.set_push_enabled(false);

        let mut out = Vec::new();
        let mut err = Vec::new();
        let input = BufReader::new(script.as_bytes());
        run_session(
            &mut app,
            &config,
            Arc::new(SilentSource),
            input,
            &mut out,
            &mut err,
        )
        .await
        .unwrap();
        assert!(app.sync_status().is_none());
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_session_add_and_filter() {
        let kv = Arc::new(MemoryKvStore::new());
        let (out, err) = session("add Poetry: Roses are red\nfilter poetry\nquit\n", kv.clone()).await;

        assert!(err.is_empty(), "unexpected errors: {}", err);
        assert!(out.contains("Quote added"));
        assert!(out.contains("\"Roses are red\"\n    -- Poetry"));
        let stored = kv.get("quotes").unwrap().unwrap();
        assert!(stored.contains("Roses are red"));
    }

    #[tokio::test]
    async fn test_session_reports_bad_lines_and_continues() {
        let kv = Arc::new(MemoryKvStore::new());
        let (out, err) = session("dance\nadd missing colon\nstatus\n", kv).await;

        assert!(err.contains("Unknown command 'dance'"));
        assert!(err.contains("usage: add"));
        // End of input ends the session like quit
        assert!(out.contains("Quotes: 8 (all)"));
    }

    #[tokio::test]
    async fn test_session_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let script = format!("export {}\nquit\n", path.display());
        let (out, _) = session(&script, Arc::new(MemoryKvStore::new())).await;

        assert!(out.contains("Exported 8 quotes"));
        let document = std::fs::read_to_string(&path).unwrap();
        assert!(document.contains("In the middle of difficulty lies opportunity."));
    }

    #[tokio::test]
    async fn test_session_missing_import_file_does_not_end_session() {
        let (out, err) = session(
            "import /definitely/not/here.json\nstatus\nquit\n",
            Arc::new(MemoryKvStore::new()),
        )
        .await;
        assert!(err.contains("Failed to read"));
        assert!(out.contains("Sync: "));
    }

    /// Answers every fetch after a delay
    struct SlowSource;

    impl RemoteSource for SlowSource {
        fn fetch(&self, _limit: usize) -> BoxFuture<'_, CoreResult<Vec<RemotePost>>> {
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(vec![RemotePost {
                    id: 7,
                    user_id: 8,
                    title: "Arrived after quit".into(),
                    body: String::new(),
                }])
            }
            .boxed()
        }

        fn push<'a>(&'a self, _post: &'a NewPost) -> BoxFuture<'a, CoreResult<serde_json::Value>> {
            async { Ok(serde_json::Value::Null) }.boxed()
        }
    }

    #[tokio::test]
    async fn test_fetch_in_flight_at_quit_is_merged() {
        let kv = Arc::new(MemoryKvStore::new());
        let mut app = QuoteApp::open(kv.clone());
        let config = CoreConfig::default();

        // Quit arrives while the first fetch is still running
        let (input, mut typing) = tokio::io::duplex(64);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            typing.write_all(b"quit\n").await.unwrap();
        });

        let mut out = Vec::new();
        let mut err = Vec::new();
        run_session(
            &mut app,
            &config,
            Arc::new(SlowSource),
            BufReader::new(input),
            &mut out,
            &mut err,
        )
        .await
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Synced 1 quotes from server"));
        assert!(app
            .store()
            .records()
            .iter()
            .any(|q| q.text == "Arrived after quit" && q.category == "Wisdom"));
        assert!(kv.get("quotes").unwrap().unwrap().contains("Arrived after quit"));
    }
}
