//! brief-tools: built-in research tools for briefing.

pub mod search;
pub mod tavily;

pub use search::{create_research_tools, RecentContentTool, TrendingDiscussionsTool};
pub use tavily::{SearchDepth, SearchRequest, SearchResponse, SearchResult, TavilyClient};
