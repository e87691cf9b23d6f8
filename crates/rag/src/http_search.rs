//! HTTP/JSON client for the hybrid search service
//!
//! `POST {endpoint}/search` with the serialized `SearchRequest`; the service
//! answers `{"results": [...]}` with passages ranked best first.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use answer_engine_config::SearchServiceConfig;
use answer_engine_core::{RetrievedPassage, SearchBackend, SearchError, SearchRequest};

use crate::RagError;

/// Search client configuration
#[derive(Debug, Clone)]
pub struct HttpSearchConfig {
    /// Base URL of the search service
    pub endpoint: String,
    /// Bearer token, if the service requires one
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for HttpSearchConfig {
    fn default() -> Self {
        Self::from(&SearchServiceConfig::default())
    }
}

impl From<&SearchServiceConfig> for HttpSearchConfig {
    fn from(config: &SearchServiceConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// Search backend over HTTP
pub struct HttpSearchBackend {
    config: HttpSearchConfig,
    client: Client,
}

impl HttpSearchBackend {
    pub fn new(config: HttpSearchConfig) -> Result<Self, RagError> {
        if config.endpoint.trim().is_empty() {
            return Err(RagError::Configuration("search endpoint is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RagError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.endpoint.trim_end_matches('/'))
    }

    fn build_headers(&self) -> reqwest::header::HeaderMap {
        use reqwest::header::HeaderValue;

        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(ref key) = self.config.api_key {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", key)) {
                headers.insert(reqwest::header::AUTHORIZATION, val);
            }
        }
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers
    }
}

/// Map a non-success status to the search error taxonomy
fn status_error(status: StatusCode, body: &str) -> SearchError {
    let detail = format!("HTTP {}: {}", status, body);
    if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        SearchError::Timeout
    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        SearchError::Unavailable(detail)
    } else {
        SearchError::Rejected(detail)
    }
}

fn transport_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Unavailable(err.to_string())
    }
}

fn parse_results(body: &str) -> Result<Vec<RetrievedPassage>, SearchError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SearchError::MalformedResponse(e.to_string()))?;
    Ok(response.results)
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RetrievedPassage>, SearchError> {
        let response = self
            .client
            .post(self.search_url())
            .headers(self.build_headers())
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let results = parse_results(&body)?;
        tracing::trace!(count = results.len(), url = %self.search_url(), "Search response");
        Ok(results)
    }

    fn name(&self) -> &str {
        "http-search"
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RetrievedPassage>,
}
