use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: ToolParameters,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: ToolParameters::default(),
        }
    }

    pub fn with_parameters(mut self, input_schema: ToolParameters) -> Self {
        self.input_schema = input_schema;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: std::collections::HashMap<String, PropertySchema>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: std::collections::HashMap::new(),
            required: Vec::new(),
        }
    }
}

impl ToolParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(
        mut self,
        name: impl Into<String>,
        schema: PropertySchema,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), schema);
        if required {
            self.required.push(name);
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertySchema {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            schema_type: "string".to_string(),
            description: Some(description.into()),
            default: None,
        }
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self {
            schema_type: "integer".to_string(),
            description: Some(description.into()),
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// A callable tool advertised to the model.
///
/// `execute` never fails: tools fold their own failures into the output
/// text so the model can read the failure and work around it.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn definition(&self) -> ToolDefinition;

    async fn execute(&self, arguments: Value) -> ToolOutput;
}

pub struct ToolRegistry {
    tools: std::collections::HashMap<String, Box<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: std::collections::HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Route a requested tool name and arguments to the matching tool.
    ///
    /// An unrecognized name is a recoverable condition: the model gets an
    /// explanatory string back as the tool result and the conversation
    /// continues.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> ToolOutput {
        match self.get(name) {
            Some(tool) => tool.execute(arguments).await,
            None => ToolOutput::error(format!("Unknown tool: {}", name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name(), self.description()).with_parameters(
                ToolParameters::new().add_property(
                    "text",
                    PropertySchema::string("Text to echo"),
                    true,
                ),
            )
        }

        async fn execute(&self, arguments: Value) -> ToolOutput {
            ToolOutput::success(arguments["text"].as_str().unwrap_or_default())
        }
    }

    #[test]
    fn test_tool_definition() {
        let def = ToolDefinition::new("search_recent_content", "Search recent content")
            .with_parameters(
                ToolParameters::new()
                    .add_property("query", PropertySchema::string("Search query"), true)
                    .add_property(
                        "max_results",
                        PropertySchema::integer("Max results").with_default(Value::from(10)),
                        false,
                    ),
            );

        assert_eq!(def.name, "search_recent_content");
        assert!(def.input_schema.required.contains(&"query".to_string()));
        assert!(!def.input_schema.required.contains(&"max_results".to_string()));
    }

    #[test]
    fn test_input_schema_serialization() {
        let params = ToolParameters::new()
            .add_property("query", PropertySchema::string("Search query"), true);
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["query"]["type"], "string");
        assert_eq!(json["required"][0], "query");
    }

    #[tokio::test]
    async fn test_dispatch_known_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let out = registry
            .dispatch("echo", serde_json::json!({"text": "hi"}))
            .await;
        assert!(!out.is_error);
        assert_eq!(out.content, "hi");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let registry = ToolRegistry::new();
        let out = registry.dispatch("nonexistent", Value::Null).await;
        assert!(out.is_error);
        assert_eq!(out.content, "Unknown tool: nonexistent");
    }

    #[test]
    fn test_tool_output() {
        let success = ToolOutput::success("done");
        assert!(!success.is_error);

        let error = ToolOutput::error("failed");
        assert!(error.is_error);
    }
}
