//! # Records API Client
//!
//! Thin wrapper around the remote records API. Only the reptile statistics
//! summary is used by the shell; everything else stays with the views.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Cannot reach the records API.
    #[error("Cannot connect to records API at {0}")]
    ConnectionFailed(String),
    /// 401 Unauthorized - invalid or missing token.
    #[error("Unauthorized: invalid or missing token")]
    Unauthorized,
    /// 429 Too Many Requests.
    #[error("Rate limited: too many requests")]
    RateLimited,
    /// Server returned a non-success status.
    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),
    /// Failed to parse response body.
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Reptile summary counters served by `GET /api/reptiles/stats`.
///
/// Counters missing from the response read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReptileStats {
    pub total_reptiles: i64,
    pub active_reptiles: i64,
    pub needs_feeding: i64,
    pub needs_cleaning: i64,
}

/// Source of reptile statistics.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn reptile_stats(&self) -> Result<ReptileStats, ClientError>;
}

/// HTTP client for the records API.
#[derive(Clone)]
pub struct RecordsClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RecordsClient {
    /// Create a new client pointing at the given records API URL.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with optional Bearer auth.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send a request and handle connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))
    }

    /// Check status codes and decode the JSON body.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::ServerError(status.as_u16(), body));
        }
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl StatsSource for RecordsClient {
    /// GET /api/reptiles/stats
    async fn reptile_stats(&self) -> Result<ReptileStats, ClientError> {
        let req = self.request(reqwest::Method::GET, "/api/reptiles/stats");
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }
}
