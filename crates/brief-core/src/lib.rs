//! brief-core: Core types and the research loop for briefing
//!
//! This crate provides the conversation model, the provider and tool
//! boundaries, and the bounded agent loop that drives a research request.

pub mod agent;
pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use agent::{
    research_prompt, AgentConfig, ResearchAgent, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_TOKENS,
};
pub use error::Error;
pub use message::{Content, ContentBlock, Message, Role, Usage};
pub use provider::{CompletionRequest, CompletionResponse, Provider, StopReason};
pub use tool::{PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters, ToolRegistry};

pub type Result<T> = std::result::Result<T, Error>;
