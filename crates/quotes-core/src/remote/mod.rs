pub mod http;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_REMOTE_CATEGORY, ORIGIN_CATEGORIES, PUSH_USER_ID};
use crate::error::Result;
use crate::models::QuoteRecord;

pub use http::HttpRemoteSource;

/// Item returned by the remote collection endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl RemotePost {
    /// title -> text, origin (`userId`) -> category, id -> remote id
    pub fn into_quote(self, fetched_at: DateTime<Utc>) -> QuoteRecord {
        let category = category_for_origin(self.user_id);
        QuoteRecord::remote(self.title, category, self.id, fetched_at)
    }
}

/// Payload sent when pushing a local quote outward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

impl From<&QuoteRecord> for NewPost {
    fn from(quote: &QuoteRecord) -> Self {
        Self {
            title: quote.text.clone(),
            body: quote.category.clone(),
            user_id: PUSH_USER_ID,
        }
    }
}

pub fn category_for_origin(origin: u64) -> &'static str {
    ORIGIN_CATEGORIES
        .iter()
        .find(|(id, _)| *id == origin)
        .map(|(_, category)| *category)
        .unwrap_or(DEFAULT_REMOTE_CATEGORY)
}

/// The untrusted remote source quotes are reconciled against.
pub trait RemoteSource: Send + Sync {
    /// Fetch at most `limit` items
    fn fetch(&self, limit: usize) -> BoxFuture<'_, Result<Vec<RemotePost>>>;

    /// Send one item; the response body is returned for logging only
    fn push<'a>(&'a self, post: &'a NewPost) -> BoxFuture<'a, Result<serde_json::Value>>;
}

/// Fetch a page and map it into quote records stamped with the current time.
pub async fn fetch_remote(source: &dyn RemoteSource, limit: usize) -> Result<Vec<QuoteRecord>> {
    let posts = source.fetch(limit).await?;
    let fetched_at = Utc::now();
    // The source may ignore the limit
    Ok(posts
        .into_iter()
        .take(limit)
        .map(|post| post.into_quote(fetched_at))
        .collect())
}
