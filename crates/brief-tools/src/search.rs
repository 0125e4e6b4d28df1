//! The two research tools advertised to the model.
//!
//! Both return text and never fail past `execute`: a search failure becomes
//! an error-flagged tool result the model can read and work around, rather
//! than a fault that would abort the whole research run.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use brief_core::{PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};

use crate::tavily::{SearchRequest, TavilyClient};

/// Allow-list for recent-content searches: paper repositories and
/// long-form blogging platforms.
const CONTENT_DOMAINS: [&str; 5] = [
    "arxiv.org",
    "medium.com",
    "substack.com",
    "dev.to",
    "hackernoon.com",
];

const DEFAULT_MAX_RESULTS: usize = 10;
const TRENDING_MAX_RESULTS: usize = 8;

// =============================================================================
// Recent Content Tool
// =============================================================================

pub struct RecentContentTool {
    client: Arc<TavilyClient>,
}

impl RecentContentTool {
    pub fn new(client: Arc<TavilyClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct RecentContentArgs {
    query: String,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

#[async_trait]
impl Tool for RecentContentTool {
    fn name(&self) -> &str {
        "search_recent_content"
    }

    fn description(&self) -> &str {
        "Search for recent articles, papers, blog posts on a topic from the last 30 days"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new()
                .add_property(
                    "query",
                    PropertySchema::string("Search query for finding recent content"),
                    true,
                )
                .add_property(
                    "max_results",
                    PropertySchema::integer("Maximum number of results to return")
                        .with_default(serde_json::Value::from(DEFAULT_MAX_RESULTS)),
                    false,
                ),
        )
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolOutput {
        let args: RecentContentArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return ToolOutput::error(format!("Error searching: {}", e)),
        };

        let request = SearchRequest::new(args.query)
            .with_max_results(args.max_results)
            .with_include_domains(CONTENT_DOMAINS);

        match self.client.search(&request).await {
            Ok(response) => match serde_json::to_string_pretty(&response.results) {
                Ok(text) => ToolOutput::success(text),
                Err(e) => ToolOutput::error(format!("Error searching: {}", e)),
            },
            Err(e) => ToolOutput::error(format!("Error searching: {}", e)),
        }
    }
}

// =============================================================================
// Trending Discussions Tool
// =============================================================================

pub struct TrendingDiscussionsTool {
    client: Arc<TavilyClient>,
}

impl TrendingDiscussionsTool {
    pub fn new(client: Arc<TavilyClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct TrendingDiscussionsArgs {
    topic: String,
}

#[async_trait]
impl Tool for TrendingDiscussionsTool {
    fn name(&self) -> &str {
        "analyze_trending_discussions"
    }

    fn description(&self) -> &str {
        "Search for trending discussions and debates about a topic on social media and forums"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new().add_property(
                "topic",
                PropertySchema::string("The topic to analyze for trending discussions"),
                true,
            ),
        )
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolOutput {
        let args: TrendingDiscussionsArgs = match serde_json::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return ToolOutput::error(format!("Error analyzing discussions: {}", e)),
        };

        let request = SearchRequest::new(format!("{} discussion debate trending", args.topic))
            .with_max_results(TRENDING_MAX_RESULTS);

        match self.client.search(&request).await {
            Ok(response) => match serde_json::to_string_pretty(&response.results) {
                Ok(text) => ToolOutput::success(text),
                Err(e) => ToolOutput::error(format!("Error analyzing discussions: {}", e)),
            },
            Err(e) => ToolOutput::error(format!("Error analyzing discussions: {}", e)),
        }
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Create the research tool set backed by a shared search client.
pub fn create_research_tools(client: Arc<TavilyClient>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(RecentContentTool::new(Arc::clone(&client))),
        Box::new(TrendingDiscussionsTool::new(client)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::ToolRegistry;

    fn mock_results_body() -> String {
        serde_json::json!({
            "results": [{
                "title": "Debating vector databases",
                "url": "https://example.com/debate",
                "content": "Lots of opinions.",
                "score": 0.9
            }]
        })
        .to_string()
    }

    fn unreachable_client() -> Arc<TavilyClient> {
        // Nothing listens here; requests fail fast with a network error.
        Arc::new(TavilyClient::new("tvly-key").with_base_url("http://127.0.0.1:1"))
    }

    #[test]
    fn test_tool_definitions() {
        let client = unreachable_client();
        let recent = RecentContentTool::new(Arc::clone(&client));
        let trending = TrendingDiscussionsTool::new(client);

        let def = recent.definition();
        assert_eq!(def.name, "search_recent_content");
        assert!(def.input_schema.required.contains(&"query".to_string()));
        assert!(!def.input_schema.required.contains(&"max_results".to_string()));
        assert_eq!(
            def.input_schema.properties["max_results"].default,
            Some(serde_json::Value::from(10))
        );

        let def = trending.definition();
        assert_eq!(def.name, "analyze_trending_discussions");
        assert!(def.input_schema.required.contains(&"topic".to_string()));
    }

    #[test]
    fn test_factory_registers_both_tools() {
        let mut registry = ToolRegistry::new();
        for tool in create_research_tools(unreachable_client()) {
            registry.register(tool);
        }
        assert_eq!(registry.len(), 2);
        assert!(registry.get("search_recent_content").is_some());
        assert!(registry.get("analyze_trending_discussions").is_some());
    }

    #[tokio::test]
    async fn test_recent_content_applies_domain_allowlist_and_default_cap() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "query": "vector databases",
                "search_depth": "advanced",
                "max_results": 10,
                "include_domains": CONTENT_DOMAINS,
            })))
            .with_status(200)
            .with_body(mock_results_body())
            .create_async()
            .await;

        let client = Arc::new(TavilyClient::new("tvly-key").with_base_url(server.url()));
        let tool = RecentContentTool::new(client);

        // max_results absent: defaults to 10
        let output = tool
            .execute(serde_json::json!({"query": "vector databases"}))
            .await;

        mock.assert_async().await;
        assert!(!output.is_error);
        assert!(output.content.contains("Debating vector databases"));
    }

    #[tokio::test]
    async fn test_recent_content_honors_max_results_override() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_body(mockito::Matcher::PartialJson(
                serde_json::json!({"max_results": 3}),
            ))
            .with_status(200)
            .with_body(mock_results_body())
            .create_async()
            .await;

        let client = Arc::new(TavilyClient::new("tvly-key").with_base_url(server.url()));
        let tool = RecentContentTool::new(client);
        let output = tool
            .execute(serde_json::json!({"query": "q", "max_results": 3}))
            .await;

        mock.assert_async().await;
        assert!(!output.is_error);
    }

    #[tokio::test]
    async fn test_trending_query_template_and_fixed_cap() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "query": "edge computing discussion debate trending",
                "max_results": 8,
            })))
            .with_status(200)
            .with_body(mock_results_body())
            .create_async()
            .await;

        let client = Arc::new(TavilyClient::new("tvly-key").with_base_url(server.url()));
        let tool = TrendingDiscussionsTool::new(client);
        let output = tool
            .execute(serde_json::json!({"topic": "edge computing"}))
            .await;

        mock.assert_async().await;
        assert!(!output.is_error);
    }

    #[tokio::test]
    async fn test_search_failure_is_swallowed_into_text() {
        let tool = RecentContentTool::new(unreachable_client());
        let output = tool.execute(serde_json::json!({"query": "q"})).await;
        assert!(output.is_error);
        assert!(output.content.starts_with("Error searching:"));
    }

    #[tokio::test]
    async fn test_trending_failure_is_swallowed_into_text() {
        let tool = TrendingDiscussionsTool::new(unreachable_client());
        let output = tool.execute(serde_json::json!({"topic": "t"})).await;
        assert!(output.is_error);
        assert!(output.content.starts_with("Error analyzing discussions:"));
    }

    #[tokio::test]
    async fn test_missing_required_argument_is_swallowed_into_text() {
        let tool = RecentContentTool::new(unreachable_client());
        let output = tool.execute(serde_json::json!({})).await;
        assert!(output.is_error);
        assert!(output.content.starts_with("Error searching:"));
    }

    #[tokio::test]
    async fn test_extra_arguments_are_tolerated() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(200)
            .with_body(mock_results_body())
            .create_async()
            .await;

        let client = Arc::new(TavilyClient::new("tvly-key").with_base_url(server.url()));
        let tool = RecentContentTool::new(client);
        let output = tool
            .execute(serde_json::json!({"query": "q", "unexpected": true}))
            .await;
        assert!(!output.is_error);
    }
}
