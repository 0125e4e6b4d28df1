//! Thin client for the Tavily search API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use brief_core::Error;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("brief-cli/0.1.0")
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, Error> {
        debug!(
            query = %request.query,
            depth = ?request.search_depth,
            max_results = request.max_results,
            domains = request.include_domains.len(),
            "Tavily search"
        );

        let body = SearchBody {
            api_key: &self.api_key,
            request,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => Error::auth(text),
                429 => Error::rate_limit(text),
                code => Error::api(code, text),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::serialization(e.to_string()))?;
        trace!(response = %text, "Tavily response payload");

        let parsed: SearchResponse =
            serde_json::from_str(&text).map_err(|e| Error::serialization(e.to_string()))?;

        debug!(results = parsed.results.len(), "Tavily search complete");
        Ok(parsed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    Advanced,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub search_depth: SearchDepth,
    pub max_results: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_depth: SearchDepth::Advanced,
            max_results: 10,
            include_domains: Vec::new(),
        }
    }

    pub fn with_search_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = depth;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_include_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_domains = domains.into_iter().map(Into::into).collect();
        self
    }
}

/// Wire body: the request fields plus the api key.
#[derive(Serialize)]
struct SearchBody<'a> {
    api_key: &'a str,
    #[serde(flatten)]
    request: &'a SearchRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Snippet of the page content.
    pub content: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}
