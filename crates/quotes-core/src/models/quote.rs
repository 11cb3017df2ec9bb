use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ALL_CATEGORIES, SEED_QUOTES};
use crate::error::{QuoteError, Result};

/// A quote and its category, optionally tagged with remote provenance.
///
/// A record carrying `remote_id` is owned by the remote source: the next
/// reconciliation discards it and re-inserts whatever the remote returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub text: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_timestamp: Option<DateTime<Utc>>,
}

impl QuoteRecord {
    /// Build a local record, trimming both fields.
    /// Fails if either field is blank.
    pub fn new(text: &str, category: &str) -> Result<Self> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() {
            return Err(QuoteError::Validation("text"));
        }
        if category.is_empty() {
            return Err(QuoteError::Validation("category"));
        }
        if is_reserved_category(category) {
            return Err(QuoteError::ReservedCategory(category.to_string()));
        }
        Ok(Self::local(text, category))
    }

    /// Build a local record as-is (no trimming or validation)
    pub fn local(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            remote_id: None,
            remote_timestamp: None,
        }
    }

    /// Build a record materialized from the remote source
    pub fn remote(
        text: impl Into<String>,
        category: impl Into<String>,
        remote_id: u64,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            remote_id: Some(remote_id),
            remote_timestamp: Some(fetched_at),
        }
    }

    pub fn is_remote_owned(&self) -> bool {
        self.remote_id.is_some()
    }

    /// Same quote for reconciliation purposes: text compared case-insensitively,
    /// category compared exactly.
    pub fn same_quote_as(&self, other: &QuoteRecord) -> bool {
        self.category == other.category && eq_ignore_case(&self.text, &other.text)
    }

    pub fn in_category(&self, category: &str) -> bool {
        eq_ignore_case(&self.category, category)
    }
}

/// Category labels that collide with the "every category" filter value
pub(crate) fn is_reserved_category(category: &str) -> bool {
    category.trim().eq_ignore_ascii_case(ALL_CATEGORIES)
}

/// Unicode-aware case-insensitive comparison
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// The built-in quote list
pub fn seed_quotes() -> Vec<QuoteRecord> {
    SEED_QUOTES
        .iter()
        .map(|(text, category)| QuoteRecord::local(*text, *category))
        .collect()
}
