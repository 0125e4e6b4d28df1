use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file: ~/.config/brief/config.toml. Every field is
/// optional; a missing file yields the defaults. Credentials are read
/// from the process environment at wiring time, never from this file's
/// absence — a missing key surfaces as a provider auth fault, not a
/// startup error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model override for the research agent.
    #[serde(default)]
    pub model: Option<String>,

    /// Output token cap per model call.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Maximum model round-trips per research request.
    #[serde(default)]
    pub max_iterations: Option<usize>,

    #[serde(default)]
    pub anthropic: EndpointEntry,

    #[serde(default)]
    pub tavily: EndpointEntry,
}

/// Per-service endpoint overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointEntry {
    /// API key; falls back to the service's environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL override (proxies, self-hosted gateways).
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("brief").join("config.toml"))
    }

    /// Anthropic credential: config file > ANTHROPIC_KEY environment.
    /// Empty when neither is set; the provider will report the auth fault.
    pub fn anthropic_key(&self) -> String {
        self.anthropic
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_KEY").ok())
            .unwrap_or_default()
    }

    /// Tavily credential: config file > TAVILY_KEY environment.
    pub fn tavily_key(&self) -> String {
        self.tavily
            .api_key
            .clone()
            .or_else(|| std::env::var("TAVILY_KEY").ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert!(config.model.is_none());
        assert!(config.max_iterations.is_none());
        assert!(config.anthropic.api_key.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
model = "claude-sonnet-4-5-20250929"
max_tokens = 2048
max_iterations = 3

[anthropic]
api_key = "sk-ant-test"

[tavily]
base_url = "http://localhost:9000"
"#
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.model.as_deref(), Some("claude-sonnet-4-5-20250929"));
        assert_eq!(config.max_tokens, Some(2048));
        assert_eq!(config.max_iterations, Some(3));
        assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-test"));
        assert_eq!(config.tavily.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.anthropic_key(), "sk-ant-test");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [not toml").unwrap();
        assert!(Config::load_from_path(&path).is_err());
    }
}
