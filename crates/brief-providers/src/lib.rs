//! brief-providers: model provider implementations for briefing.

mod anthropic;

pub use anthropic::{AnthropicProvider, DEFAULT_MODEL};
