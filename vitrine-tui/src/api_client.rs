//! REST client for the VITRINE API.

use crate::config::TuiConfig;
use serde::Deserialize;
use std::time::Duration;
use vitrine_core::{Item, ItemId, ItemPage, StatsSummary};

/// Header carrying `HIT` or `MISS` on stats responses.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{code}: {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
    },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl ApiClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }
}

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Stats together with the cache status the server reported.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReading {
    pub summary: StatsSummary,
    pub cache_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub message: String,
    pub stats: StatsSummary,
}

/// Query for one page of the item listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsQuery {
    pub page: u64,
    pub limit: u64,
    pub q: Option<String>,
}

impl ItemsQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        pairs
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_items(&self, query: &ItemsQuery) -> Result<ItemPage, ApiClientError> {
        let response = self
            .client
            .get(self.url("/api/items"))
            .query(&query.query_pairs())
            .send()
            .await?;
        parse_response(response).await
    }

    pub async fn get_item(&self, id: ItemId) -> Result<Item, ApiClientError> {
        let response = self
            .client
            .get(self.url(&format!("/api/items/{}", id)))
            .send()
            .await?;
        parse_response(response).await
    }

    pub async fn stats(&self) -> Result<StatsReading, ApiClientError> {
        let response = self.client.get(self.url("/api/stats")).send().await?;
        let cache_status = response
            .headers()
            .get(CACHE_STATUS_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let summary = parse_response(response).await?;
        Ok(StatsReading {
            summary,
            cache_status,
        })
    }

    pub async fn refresh_stats(&self) -> Result<RefreshResponse, ApiClientError> {
        let response = self
            .client
            .post(self.url("/api/stats/refresh"))
            .send()
            .await?;
        parse_response(response).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiClientError> {
    let status = response.status();
    let text = response.text().await?;
    if status.is_success() {
        return Ok(serde_json::from_str(&text)?);
    }
    Err(error_from_body(status.as_u16(), &text))
}

fn error_from_body(status: u16, text: &str) -> ApiClientError {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => ApiClientError::Server {
            status,
            code: body.code,
            message: body.message,
        },
        Err(_) => ApiClientError::InvalidResponse(format!("HTTP {}: {}", status, text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_empty_search() {
        let query = ItemsQuery {
            page: 2,
            limit: 10,
            q: Some(String::new()),
        };
        assert_eq!(
            query.query_pairs(),
            vec![("page", "2".to_string()), ("limit", "10".to_string())]
        );

        let query = ItemsQuery {
            q: Some("desk".to_string()),
            ..query
        };
        assert_eq!(query.query_pairs().last(), Some(&("q", "desk".to_string())));
    }

    #[test]
    fn test_error_from_structured_body() {
        let err = error_from_body(404, r#"{"code":"ITEM_NOT_FOUND","message":"Item not found"}"#);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "ITEM_NOT_FOUND: Item not found");
    }

    #[test]
    fn test_error_from_plain_body() {
        let err = error_from_body(502, "Bad Gateway");
        assert!(matches!(err, ApiClientError::InvalidResponse(ref m) if m.contains("502")));
        assert!(!err.is_not_found());
    }
}
