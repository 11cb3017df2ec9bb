use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use quotes_core::remote::{fetch_remote, NewPost, RemoteSource};
use quotes_core::sync::SyncUpdate;
use quotes_core::{AppEvent, CategoryFilter, CoreConfig, CoreEvent, QuoteApp, QuoteRecord};
use tokio::io::BufReader;

use super::protocol::CliCommand;
use super::render::print_events;
use super::session::run_session;

/// Run a single command against `app`.
/// Returns true if the command reported an error to the user.
pub async fn execute<O: Write, E: Write>(
    command: CliCommand,
    app: &mut QuoteApp,
    config: &CoreConfig,
    source: Arc<dyn RemoteSource>,
    out: &mut O,
    err: &mut E,
) -> Result<bool> {
    match command {
        CliCommand::Show { category: None } => {
            Ok(print_events(out, err, &app.handle(AppEvent::ShowAnother))?)
        }
        CliCommand::Show {
            category: Some(category),
        } => {
            let display = app.display_for(&CategoryFilter::parse(&category));
            Ok(print_events(out, err, &[CoreEvent::Display(display)])?)
        }
        CliCommand::Categories => Ok(print_events(out, err, &app.handle(AppEvent::Categories))?),
        CliCommand::Filter { value } => {
            Ok(print_events(out, err, &app.handle(AppEvent::SetFilter(value)))?)
        }
        CliCommand::Add {
            text,
            category,
            no_push,
        } => {
            let events = app.handle(AppEvent::AddQuote {
                text: text.clone(),
                category: category.clone(),
            });
            if print_events(out, err, &events)? {
                return Ok(true);
            }
            if config.push_enabled && !no_push {
                let quote = QuoteRecord::new(&text, &category)?;
                let update = push_once(source.as_ref(), &quote).await;
                // The quote stays stored locally whether or not the push worked
                print_events(out, err, &app.apply_sync_update(update))?;
            }
            Ok(false)
        }
        CliCommand::Export { path } => export_to(app, &path, out, err).await,
        CliCommand::Import { path } => import_from(app, &path, out, err).await,
        CliCommand::Sync => {
            let update = match fetch_remote(source.as_ref(), config.page_size).await {
                Ok(quotes) => SyncUpdate::Fetched { quotes },
                Err(error) => SyncUpdate::FetchFailed { error },
            };
            Ok(print_events(out, err, &app.apply_sync_update(update))?)
        }
        CliCommand::Run => {
            let input = BufReader::new(tokio::io::stdin());
            run_session(app, config, source, input, out, err).await?;
            Ok(false)
        }
    }
}

async fn push_once(source: &dyn RemoteSource, quote: &QuoteRecord) -> SyncUpdate {
    let post = NewPost::from(quote);
    match source.push(&post).await {
        Ok(response) => SyncUpdate::Pushed {
            text: quote.text.clone(),
            response,
        },
        Err(error) => SyncUpdate::PushFailed {
            text: quote.text.clone(),
            error,
        },
    }
}

pub(crate) async fn export_to<O: Write, E: Write>(
    app: &mut QuoteApp,
    path: &Path,
    out: &mut O,
    err: &mut E,
) -> Result<bool> {
    let events = app.handle(AppEvent::Export);
    for event in &events {
        if let CoreEvent::Exported { document, count } = event {
            tokio::fs::write(path, document)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Exported {} quotes to {}", count, path.display());
            writeln!(out, "Exported {} quotes to {}", count, path.display())?;
        }
    }
    Ok(print_events(out, err, &events)?)
}

pub(crate) async fn import_from<O: Write, E: Write>(
    app: &mut QuoteApp,
    path: &Path,
    out: &mut O,
    err: &mut E,
) -> Result<bool> {
    let document = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(print_events(out, err, &app.handle(AppEvent::Import { document }))?)
}
