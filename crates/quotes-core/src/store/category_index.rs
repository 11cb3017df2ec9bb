use std::collections::HashSet;
use std::sync::Arc;

use crate::constants::{keys, ALL_CATEGORIES};
use crate::error::{QuoteError, Result};
use crate::models::quote::{eq_ignore_case, is_reserved_category};
use crate::models::{CategoryFilter, QuoteRecord};
use crate::store::KeyValueStore;

/// Distinct categories of `quotes`, sorted case-insensitively, with `"all"` first.
///
/// Categories differing only by case collapse into the first-seen spelling.
/// A category spelled like the sentinel (only reachable through import) is
/// left out; its quotes still show under `"all"`.
pub fn categories(quotes: &[QuoteRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut distinct: Vec<&str> = Vec::new();
    for quote in quotes {
        if is_reserved_category(&quote.category) {
            continue;
        }
        if seen.insert(quote.category.to_lowercase()) {
            distinct.push(&quote.category);
        }
    }
    distinct.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)));

    let mut result = Vec::with_capacity(distinct.len() + 1);
    result.push(ALL_CATEGORIES.to_string());
    result.extend(distinct.into_iter().map(String::from));
    result
}

/// Tracks the selected category filter, persisted under its own key.
pub struct CategoryIndex {
    kv: Arc<dyn KeyValueStore>,
    selected: CategoryFilter,
}

impl CategoryIndex {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            selected: CategoryFilter::All,
        }
    }

    pub fn categories(&self, quotes: &[QuoteRecord]) -> Vec<String> {
        categories(quotes)
    }

    /// Read the persisted filter. Falls back to `All` when nothing is stored,
    /// the read fails, or the stored category no longer exists in `quotes`.
    pub fn restore(&mut self, quotes: &[QuoteRecord]) -> &CategoryFilter {
        let stored = match self.kv.get(keys::SELECTED_CATEGORY) {
            Ok(value) => value.map(|v| CategoryFilter::parse(&v)),
            Err(e) => {
                tracing::warn!("Failed to read persisted filter: {}", e);
                None
            }
        };

        self.selected = match stored {
            Some(filter @ CategoryFilter::Category(_)) => {
                if quotes.iter().any(|q| filter.matches(q)) {
                    filter
                } else {
                    tracing::info!("Persisted filter '{}' no longer exists, using all", filter);
                    CategoryFilter::All
                }
            }
            _ => CategoryFilter::All,
        };
        &self.selected
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.selected
    }

    /// Select and persist a filter. The value must be `"all"` or one of
    /// `categories(quotes)`, matched case-insensitively and stored with the
    /// listed spelling. On rejection the current filter stays as it was.
    pub fn set_filter(&mut self, value: &str, quotes: &[QuoteRecord]) -> Result<&CategoryFilter> {
        let filter = match CategoryFilter::parse(value) {
            CategoryFilter::All => CategoryFilter::All,
            CategoryFilter::Category(wanted) => {
                let known = categories(quotes)
                    .into_iter()
                    .skip(1)
                    .find(|c| eq_ignore_case(c, &wanted))
                    .ok_or_else(|| QuoteError::UnknownCategory(wanted))?;
                CategoryFilter::Category(known)
            }
        };
        self.kv.set(keys::SELECTED_CATEGORY, filter.as_str())?;
        self.selected = filter;
        Ok(&self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_quotes;
    use crate::store::MemoryKvStore;

    #[test]
    fn test_categories_on_seed() {
        let cats = categories(&seed_quotes());
        assert_eq!(
            cats,
            vec![
                "all",
                "Dreams",
                "Inspiration",
                "Leadership",
                "Life",
                "Motivation",
                "Opportunity",
                "Success"
            ]
        );
    }

    #[test]
    fn test_categories_empty_store_still_has_all() {
        assert_eq!(categories(&[]), vec!["all"]);
    }

    #[test]
    fn test_categories_sorted_and_distinct() {
        let quotes = vec![
            QuoteRecord::local("1", "zeta"),
            QuoteRecord::local("2", "Alpha"),
            QuoteRecord::local("3", "alpha"),
            QuoteRecord::local("4", "Beta"),
            QuoteRecord::local("5", "zeta"),
        ];
        let cats = categories(&quotes);
        assert_eq!(cats, vec!["all", "Alpha", "Beta", "zeta"]);

        let rest = &cats[1..];
        let mut sorted = rest.to_vec();
        sorted.sort_by_key(|c| c.to_lowercase());
        assert_eq!(rest, sorted.as_slice());
    }

    #[test]
    fn test_set_filter_persists() {
        let kv = Arc::new(MemoryKvStore::new());
        let mut index = CategoryIndex::new(kv.clone());
        index.set_filter("Life", &seed_quotes()).unwrap();
        assert_eq!(
            kv.get(keys::SELECTED_CATEGORY).unwrap().as_deref(),
            Some("Life")
        );

        let mut restored = CategoryIndex::new(kv);
        assert_eq!(
            restored.restore(&seed_quotes()),
            &CategoryFilter::Category("Life".into())
        );
    }

    #[test]
    fn test_set_filter_uses_listed_spelling() {
        let mut index = CategoryIndex::new(Arc::new(MemoryKvStore::new()));
        assert_eq!(
            index.set_filter("  leadership ", &seed_quotes()).unwrap(),
            &CategoryFilter::Category("Leadership".into())
        );
        assert_eq!(
            index.set_filter("ALL", &seed_quotes()).unwrap(),
            &CategoryFilter::All
        );
    }

    #[test]
    fn test_set_filter_rejects_unknown_category() {
        let kv = Arc::new(MemoryKvStore::new());
        let mut index = CategoryIndex::new(kv.clone());
        index.set_filter("Life", &seed_quotes()).unwrap();

        let err = index.set_filter("Poetry", &seed_quotes()).unwrap_err();
        assert_eq!(err, QuoteError::UnknownCategory("Poetry".into()));
        assert_eq!(index.filter(), &CategoryFilter::Category("Life".into()));
        assert_eq!(
            kv.get(keys::SELECTED_CATEGORY).unwrap().as_deref(),
            Some("Life")
        );
    }

    #[test]
    fn test_categories_skip_sentinel_spelling() {
        // Imports are appended verbatim, so a record may carry the sentinel
        let quotes = vec![
            QuoteRecord::local("x", "ALL"),
            QuoteRecord::local("y", "Life"),
            QuoteRecord::local("z", "all"),
        ];
        assert_eq!(categories(&quotes), vec!["all", "Life"]);
    }

    #[test]
    fn test_restore_unknown_category_falls_back_to_all() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.set(keys::SELECTED_CATEGORY, "Vanished").unwrap();
        let mut index = CategoryIndex::new(kv);
        assert_eq!(index.restore(&seed_quotes()), &CategoryFilter::All);
    }

    #[test]
    fn test_restore_without_persisted_value() {
        let mut index = CategoryIndex::new(Arc::new(MemoryKvStore::new()));
        assert_eq!(index.restore(&seed_quotes()), &CategoryFilter::All);
    }
}
