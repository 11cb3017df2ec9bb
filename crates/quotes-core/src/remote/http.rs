use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::{QuoteError, Result};
use crate::remote::{NewPost, RemotePost, RemoteSource};

/// `RemoteSource` over a REST collection at `{base_url}/posts`
pub struct HttpRemoteSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Client with a per-request timeout; `None` keeps the transport default
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    async fn get_posts(&self, limit: usize) -> Result<Vec<RemotePost>> {
        let response = self
            .client
            .get(self.posts_url())
            .query(&[("_limit", limit)])
            .send()
            .await?;

        let response = error_for_status(response).await?;
        response
            .json::<Vec<RemotePost>>()
            .await
            .map_err(|e| QuoteError::Network(format!("Failed to parse remote posts: {}", e)))
    }

    async fn post_one(&self, post: &NewPost) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(self.posts_url())
            .json(post)
            .send()
            .await?;

        let response = error_for_status(response).await?;
        // Body is informational only
        Ok(response.json().await.unwrap_or(serde_json::Value::Null))
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(QuoteError::RemoteStatus { status, body })
}

impl RemoteSource for HttpRemoteSource {
    fn fetch(&self, limit: usize) -> BoxFuture<'_, Result<Vec<RemotePost>>> {
        self.get_posts(limit).boxed()
    }

    fn push<'a>(&'a self, post: &'a NewPost) -> BoxFuture<'a, Result<serde_json::Value>> {
        self.post_one(post).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};

    #[derive(Clone, Default)]
    struct ServerState {
        pushed: Arc<Mutex<Vec<NewPost>>>,
        limits: Arc<Mutex<Vec<String>>>,
    }

    async fn list_posts(
        State(state): State<ServerState>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        if let Some(limit) = params.get("_limit") {
            state.limits.lock().unwrap().push(limit.clone());
        }
        Json(serde_json::json!([
            {"userId": 1, "id": 1, "title": "first title", "body": "b1"},
            {"userId": 12, "id": 2, "title": "second title", "body": "b2"}
        ]))
    }

    async fn create_post(
        State(state): State<ServerState>,
        Json(post): Json<NewPost>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        state.pushed.lock().unwrap().push(post.clone());
        (
            StatusCode::CREATED,
            Json(serde_json::json!({"id": 101, "title": post.title})),
        )
    }

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_and_push_against_local_server() {
        let state = ServerState::default();
        let router = Router::new()
            .route("/posts", get(list_posts).post(create_post))
            .with_state(state.clone());
        let base = spawn_server(router).await;

        let source = HttpRemoteSource::new(format!("{}/", base));
        assert_eq!(source.base_url(), base);

        let posts = source.fetch(10).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "first title");
        assert_eq!(posts[1].user_id, 12);
        assert_eq!(state.limits.lock().unwrap().as_slice(), ["10"]);

        let post = NewPost {
            title: "Local quote".into(),
            body: "Life".into(),
            user_id: 1,
        };
        let response = source.push(&post).await.unwrap();
        assert_eq!(response["id"], 101);
        assert_eq!(state.pushed.lock().unwrap().as_slice(), [post]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let router = Router::new().route(
            "/posts",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let base = spawn_server(router).await;

        let source = HttpRemoteSource::new(base);
        let err = source.fetch(10).await.unwrap_err();
        assert_eq!(
            err,
            QuoteError::RemoteStatus {
                status: 503,
                body: "maintenance".into()
            }
        );
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source =
            HttpRemoteSource::with_timeout(format!("http://{}", addr), Some(Duration::from_secs(2)))
                .unwrap();
        let err = source.fetch(10).await.unwrap_err();
        assert!(matches!(err, QuoteError::Network(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_network_error() {
        let router = Router::new().route("/posts", get(|| async { "not json" }));
        let base = spawn_server(router).await;

        let err = HttpRemoteSource::new(base).fetch(5).await.unwrap_err();
        assert!(matches!(err, QuoteError::Network(msg) if msg.contains("parse")));
    }
}
