//! The bounded research loop.
//!
//! One `run()` call owns one conversation: a single user message built from
//! the topic, then at most `max_iterations` model round-trips. Tool requests
//! from the model are answered through the [`ToolRegistry`] and fed back in;
//! anything that can be expressed as text (search failures, unknown tools)
//! stays inside the conversation so the model can adapt. Faults on the model
//! channel itself end the run.

use std::sync::Arc;

use tracing::debug;

use crate::error::Error;
use crate::message::{ContentBlock, Message};
use crate::provider::{CompletionRequest, Provider, StopReason};
use crate::tool::ToolRegistry;

/// Hard cap on model round-trips per research request.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum model round-trips before giving up.
    pub max_iterations: usize,
    /// Output token cap per model call.
    pub max_tokens: u32,
    /// Model override; None uses the provider's default.
    pub model: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_tokens: DEFAULT_MAX_TOKENS,
            model: None,
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Build the research task prompt for a topic.
pub fn research_prompt(topic: &str) -> String {
    format!(
        "Research this topic for a technical newsletter: {topic}\n\n\
         Your task is to:\n\
         1. Find 5-7 most relevant recent articles, papers, or blog posts (prioritize last 30 days)\n\
         2. Identify what's being debated or is controversial about this topic\n\
         3. Suggest what angle hasn't been covered yet or is underexplored\n\
         4. Propose 3 everyday analogies that could explain this technical topic to a general audience\n\n\
         Format your final response as a research brief with clear sections."
    )
}

/// Runs research requests against a model provider and a set of tools.
///
/// Stateless across runs: each call to [`run`](Self::run) owns its own
/// conversation and discards it on completion.
pub struct ResearchAgent {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl ResearchAgent {
    pub fn new(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            provider,
            tools,
            config: AgentConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one research request to completion.
    ///
    /// Always returns text: the model's final brief, or one of the terminal
    /// messages for exhaustion, unexpected stop, or a provider fault.
    pub async fn run(&self, topic: &str) -> String {
        match self.run_loop(topic).await {
            Ok(text) => text,
            Err(e) => format!("Error running agent: {}", e),
        }
    }

    async fn run_loop(&self, topic: &str) -> Result<String, Error> {
        let mut messages = vec![Message::user(research_prompt(topic))];

        debug!(
            topic = topic,
            max_iterations = self.config.max_iterations,
            tools_available = self.tools.len(),
            "Research run starting"
        );

        for iteration in 0..self.config.max_iterations {
            debug!(
                iteration = iteration,
                message_count = messages.len(),
                "Research iteration starting"
            );

            let mut request = CompletionRequest::new(messages.clone())
                .with_max_tokens(self.config.max_tokens)
                .with_tools(self.tools.definitions());
            if let Some(model) = &self.config.model {
                request = request.with_model(model.as_str());
            }

            let response = self.provider.complete(request).await?;

            match response.stop_reason {
                StopReason::EndTurn => {
                    let text = response.text();
                    debug!(
                        iterations = iteration + 1,
                        response_len = text.len(),
                        prompt_tokens = response.usage.prompt_tokens,
                        completion_tokens = response.usage.completion_tokens,
                        "Research run completed"
                    );
                    return Ok(text);
                }
                StopReason::ToolUse => {
                    // Keep the assistant's turn whole, tool-use blocks included,
                    // then answer every request in response order in one message.
                    messages.push(Message::assistant_blocks(response.content.clone()));

                    let mut results = Vec::new();
                    for block in &response.content {
                        if let ContentBlock::ToolUse { id, name, input } = block {
                            debug!(tool = %name, tool_use_id = %id, "Executing tool");
                            let output = self.tools.dispatch(name, input.clone()).await;
                            debug!(
                                tool = %name,
                                result_len = output.content.len(),
                                is_error = output.is_error,
                                "Tool result"
                            );
                            results.push(if output.is_error {
                                ContentBlock::tool_error(id, output.content)
                            } else {
                                ContentBlock::tool_result(id, output.content)
                            });
                        }
                    }
                    messages.push(Message::tool_results(results));
                }
                StopReason::Other(reason) => {
                    debug!(stop_reason = %reason, "Unexpected stop reason");
                    return Ok(format!("Agent stopped unexpectedly: {}", reason));
                }
            }
        }

        Ok("Agent reached maximum iterations without completing the task.".to_string())
    }
}
