use std::sync::Arc;

use crate::codec;
use crate::events::{AppEvent, CoreEvent, QuoteDisplay};
use crate::models::{CategoryFilter, QuoteRecord};
use crate::selector::Selector;
use crate::store::{CategoryIndex, KeyValueStore, LoadOutcome, QuoteStore};
use crate::sync::{reconcile, SyncClient, SyncStatus, SyncUpdate};

/// Application context: owns the store, the filter and the selector, and
/// optionally talks to a running sync worker.
///
/// Every UI interaction goes through `handle`; every worker result goes
/// through `apply_sync_update`. Both return the `CoreEvent`s the UI should
/// render and never fail: errors come back as error statuses.
pub struct QuoteApp {
    store: QuoteStore,
    index: CategoryIndex,
    selector: Selector,
    sync: Option<SyncClient>,
    push_enabled: bool,
}

impl QuoteApp {
    /// App over the seed list, without reading persisted state
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store: QuoteStore::new(kv.clone()),
            index: CategoryIndex::new(kv),
            selector: Selector::new(),
            sync: None,
            push_enabled: true,
        }
    }

    /// App hydrated from persisted state
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let mut app = Self::new(kv);
        app.hydrate();
        app
    }

    /// Load the persisted quote list, then the persisted filter
    pub fn hydrate(&mut self) -> LoadOutcome {
        let outcome = self.store.load();
        self.index.restore(self.store.records());
        outcome
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }

    pub fn set_push_enabled(&mut self, enabled: bool) {
        self.push_enabled = enabled;
    }

    pub fn attach_sync(&mut self, client: SyncClient) {
        self.sync = Some(client);
    }

    pub fn detach_sync(&mut self) -> Option<SyncClient> {
        self.sync.take()
    }

    pub fn sync_status(&self) -> Option<SyncStatus> {
        self.sync.as_ref().map(SyncClient::status)
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    pub fn filter(&self) -> &CategoryFilter {
        self.index.filter()
    }

    pub fn categories(&self) -> Vec<String> {
        self.index.categories(self.store.records())
    }

    /// Random quote from the current filter, or the matching empty state
    pub fn current_display(&mut self) -> QuoteDisplay {
        let filter = self.index.filter().clone();
        self.display_for(&filter)
    }

    /// Like `current_display`, for a one-off filter that is not persisted
    pub fn display_for(&mut self, filter: &CategoryFilter) -> QuoteDisplay {
        if self.store.is_empty() {
            return QuoteDisplay::NoQuotes;
        }
        let matching = self.store.filtered(filter);
        match self.selector.pick(&matching) {
            Some(quote) => QuoteDisplay::Quote(QuoteRecord::clone(quote)),
            None => QuoteDisplay::NoQuotesInCategory(filter.to_string()),
        }
    }

    pub fn handle(&mut self, event: AppEvent) -> Vec<CoreEvent> {
        match event {
            AppEvent::ShowAnother => vec![self.display_event()],
            AppEvent::Categories => vec![self.categories_event()],
            AppEvent::AddQuote { text, category } => self.add_quote(&text, &category),
            AppEvent::SetFilter(value) => self.set_filter(&value),
            AppEvent::Import { document } => self.import(&document),
            AppEvent::Export => self.export(),
            AppEvent::RefreshRemote => self.refresh_remote(),
        }
    }

    pub fn apply_sync_update(&mut self, update: SyncUpdate) -> Vec<CoreEvent> {
        match update {
            SyncUpdate::Fetched { quotes } => self.merge_remote(quotes),
            SyncUpdate::FetchFailed { error } => {
                vec![CoreEvent::error(format!("Sync failed: {}", error))]
            }
            SyncUpdate::Pushed { text, .. } => {
                tracing::debug!("remote accepted '{}'", text);
                vec![CoreEvent::info("Quote sent to server")]
            }
            SyncUpdate::PushFailed { error, .. } => {
                vec![CoreEvent::error(format!(
                    "Failed to send quote to server: {}",
                    error
                ))]
            }
        }
    }

    fn display_event(&mut self) -> CoreEvent {
        CoreEvent::Display(self.current_display())
    }

    fn categories_event(&self) -> CoreEvent {
        CoreEvent::Categories {
            categories: self.categories(),
            selected: self.index.filter().to_string(),
        }
    }

    fn add_quote(&mut self, text: &str, category: &str) -> Vec<CoreEvent> {
        let categories_before = self.categories();
        let quote = match self.store.add(text, category) {
            Ok(quote) => quote,
            Err(e) => return vec![CoreEvent::error(e.to_string())],
        };
        tracing::info!("Added quote in category '{}'", quote.category);

        let mut events = vec![CoreEvent::info("Quote added")];
        if self.categories() != categories_before {
            events.push(self.categories_event());
        }
        events.push(self.display_event());

        if self.push_enabled {
            if let Some(sync) = &self.sync {
                if !sync.push(quote) {
                    tracing::warn!("Sync worker is not running; quote kept locally only");
                }
            }
        }
        events
    }

    fn set_filter(&mut self, value: &str) -> Vec<CoreEvent> {
        if let Err(e) = self.index.set_filter(value, self.store.records()) {
            return vec![CoreEvent::error(e.to_string())];
        }
        vec![self.categories_event(), self.display_event()]
    }

    fn import(&mut self, document: &str) -> Vec<CoreEvent> {
        let imported = codec::parse_import(document).and_then(|quotes| self.store.import_batch(quotes));
        match imported {
            Ok(count) => {
                tracing::info!("Imported {} quotes", count);
                vec![
                    CoreEvent::info(format!("Imported {} quotes", count)),
                    self.categories_event(),
                    self.display_event(),
                ]
            }
            Err(e) => {
                tracing::warn!("{}", e);
                vec![CoreEvent::error(e.to_string())]
            }
        }
    }

    fn export(&self) -> Vec<CoreEvent> {
        match codec::export(self.store.records()) {
            Ok(document) => vec![CoreEvent::Exported {
                document,
                count: self.store.len(),
            }],
            Err(e) => vec![CoreEvent::error(e.to_string())],
        }
    }

    fn refresh_remote(&self) -> Vec<CoreEvent> {
        match &self.sync {
            Some(sync) if sync.request_refresh() => vec![CoreEvent::info("Syncing with server...")],
            _ => vec![CoreEvent::error("Sync is not running")],
        }
    }

    fn merge_remote(&mut self, incoming: Vec<QuoteRecord>) -> Vec<CoreEvent> {
        let fetched = incoming.len();
        let reconciled = reconcile(self.store.records(), incoming);
        let report = reconciled.report;

        if let Err(e) = self.store.replace_all(reconciled.quotes) {
            tracing::warn!("Failed to persist reconciled quotes: {}", e);
            return vec![CoreEvent::error(format!("Sync failed: {}", e))];
        }
        tracing::info!(
            replaced = report.replaced,
            appended = report.appended,
            discarded = report.discarded_remote,
            "Reconciled {} remote quotes",
            fetched
        );

        let message = if report.conflicts() > 0 {
            format!(
                "Synced {} quotes from server; {} conflicts resolved (server wins)",
                fetched,
                report.conflicts()
            )
        } else {
            format!("Synced {} quotes from server", fetched)
        };
        vec![
            CoreEvent::info(message),
            self.categories_event(),
            self.display_event(),
        ]
    }
}
