use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use brief_core::{AgentConfig, ResearchAgent, ToolRegistry};
use brief_providers::AnthropicProvider;
use brief_tools::{create_research_tools, TavilyClient};

mod config;

use config::Config;

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Most verbose: all tracing including request/response payloads
    Trace,
    /// Verbose: model requests/responses, tool execution details
    Debug,
    /// Standard: high-level flow
    Info,
    /// Quiet: only warnings and errors
    Warn,
    /// Minimal: only errors
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser)]
#[command(name = "brief")]
#[command(author, version, about = "Research a topic for a technical newsletter", long_about = None)]
pub struct Cli {
    /// Topic to research (e.g. "vector databases", "edge computing trends 2025")
    pub topic: String,

    /// Model to use (overrides config default)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum tokens to generate per model call
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Maximum model round-trips before giving up
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Save the brief to research_<topic>.md in the current directory
    #[arg(short, long)]
    pub save: bool,

    /// Save the brief to an explicit path (implies --save)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Enable debug logging (shorthand for --log-level debug)
    #[arg(short, long)]
    pub debug: bool,
}

/// Suggested filename for a saved brief: spaces in the topic become
/// underscores.
fn brief_filename(topic: &str) -> String {
    format!("research_{}.md", topic.replace(' ', "_"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve log level: --debug overrides --log-level
    let log_level = if cli.debug {
        LogLevel::Debug
    } else {
        cli.log_level
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.as_filter()))
        .with_writer(std::io::stderr)
        .init();

    // Topic validation lives here, outside the core.
    let topic = cli.topic.trim();
    if topic.is_empty() {
        anyhow::bail!("Please enter a topic to research");
    }

    let config = Config::load()?;

    let mut provider = AnthropicProvider::new(config.anthropic_key());
    if let Some(url) = &config.anthropic.base_url {
        provider = provider.with_base_url(url);
    }
    if let Some(model) = cli.model.as_ref().or(config.model.as_ref()) {
        provider = provider.with_default_model(model);
    }

    let mut tavily = TavilyClient::new(config.tavily_key());
    if let Some(url) = &config.tavily.base_url {
        tavily = tavily.with_base_url(url);
    }

    let mut tools = ToolRegistry::new();
    for tool in create_research_tools(Arc::new(tavily)) {
        tools.register(tool);
    }

    let mut agent_config = AgentConfig::new();
    if let Some(max) = cli.max_iterations.or(config.max_iterations) {
        agent_config = agent_config.with_max_iterations(max);
    }
    if let Some(max_tokens) = cli.max_tokens.or(config.max_tokens) {
        agent_config = agent_config.with_max_tokens(max_tokens);
    }

    let agent = ResearchAgent::new(Arc::new(provider), Arc::new(tools)).with_config(agent_config);

    tracing::info!(topic = topic, "Researching");
    let brief = agent.run(topic).await;

    println!("{}", brief);

    if cli.save || cli.output.is_some() {
        let path = cli
            .output
            .unwrap_or_else(|| PathBuf::from(brief_filename(topic)));
        std::fs::write(&path, &brief)
            .with_context(|| format!("Failed to write brief to {}", path.display()))?;
        eprintln!("Saved research brief to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_filename() {
        assert_eq!(brief_filename("vector databases"), "research_vector_databases.md");
        assert_eq!(brief_filename("rust"), "research_rust.md");
        assert_eq!(
            brief_filename("edge computing trends 2025"),
            "research_edge_computing_trends_2025.md"
        );
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Trace.as_filter(), "trace");
        assert_eq!(LogLevel::Warn.as_filter(), "warn");
    }

    #[test]
    fn test_cli_parses_topic_and_flags() {
        let cli = Cli::try_parse_from([
            "brief",
            "vector databases",
            "--save",
            "--max-iterations",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.topic, "vector databases");
        assert!(cli.save);
        assert_eq!(cli.max_iterations, Some(3));
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_requires_topic() {
        assert!(Cli::try_parse_from(["brief"]).is_err());
    }
}
