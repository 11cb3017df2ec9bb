use std::sync::Arc;

use crate::constants::keys;
use crate::error::{QuoteError, Result};
use crate::models::{seed_quotes, CategoryFilter, QuoteRecord};
use crate::store::KeyValueStore;

/// What `QuoteStore::load` found in persisted storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Persisted list replaced the in-memory one
    Restored(usize),
    /// Nothing persisted yet; in-memory list kept
    Missing,
    /// Persisted blob unreadable; in-memory list kept
    Corrupt(String),
}

/// Ordered list of quotes, flushed to the key-value store after every mutation.
///
/// Mutations are transactional: if the write fails the in-memory list is
/// rolled back to what it was before the call.
pub struct QuoteStore {
    kv: Arc<dyn KeyValueStore>,
    quotes: Vec<QuoteRecord>,
}

impl QuoteStore {
    /// Store holding the built-in seed list. Call `load()` to hydrate.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_quotes(kv, seed_quotes())
    }

    pub fn with_quotes(kv: Arc<dyn KeyValueStore>, quotes: Vec<QuoteRecord>) -> Self {
        Self { kv, quotes }
    }

    /// Replace the in-memory list with the persisted one, if there is a readable one.
    pub fn load(&mut self) -> LoadOutcome {
        let blob = match self.kv.get(keys::QUOTES) {
            Ok(Some(blob)) => blob,
            Ok(None) => return LoadOutcome::Missing,
            Err(e) => {
                tracing::warn!("Failed to read persisted quotes: {}", e);
                return LoadOutcome::Corrupt(e.to_string());
            }
        };

        match serde_json::from_str::<Vec<QuoteRecord>>(&blob) {
            Ok(quotes) => {
                let count = quotes.len();
                self.quotes = quotes;
                tracing::debug!("Restored {} persisted quotes", count);
                LoadOutcome::Restored(count)
            }
            Err(e) => {
                let err = QuoteError::PersistenceParse {
                    key: keys::QUOTES.to_string(),
                    reason: e.to_string(),
                };
                tracing::warn!("{}; keeping {} in-memory quotes", err, self.quotes.len());
                LoadOutcome::Corrupt(err.to_string())
            }
        }
    }

    /// Write the full list to storage
    pub fn save(&self) -> Result<()> {
        let json =
            serde_json::to_string(&self.quotes).map_err(|e| QuoteError::Storage(e.to_string()))?;
        self.kv.set(keys::QUOTES, &json)
    }

    /// Validate, append and persist a new local quote.
    pub fn add(&mut self, text: &str, category: &str) -> Result<QuoteRecord> {
        let quote = QuoteRecord::new(text, category)?;
        self.quotes.push(quote.clone());
        if let Err(e) = self.save() {
            self.quotes.pop();
            return Err(e);
        }
        Ok(quote)
    }

    /// Append an externally supplied batch verbatim. Returns how many were added.
    pub fn import_batch(&mut self, records: Vec<QuoteRecord>) -> Result<usize> {
        let previous_len = self.quotes.len();
        let count = records.len();
        self.quotes.extend(records);
        if let Err(e) = self.save() {
            self.quotes.truncate(previous_len);
            return Err(e);
        }
        Ok(count)
    }

    /// Install a whole new list (the reconciliation result).
    pub fn replace_all(&mut self, quotes: Vec<QuoteRecord>) -> Result<()> {
        let previous = std::mem::replace(&mut self.quotes, quotes);
        if let Err(e) = self.save() {
            self.quotes = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn records(&self) -> &[QuoteRecord] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<&QuoteRecord> {
        self.quotes.iter().filter(|q| filter.matches(q)).collect()
    }
}
