//! Tool registrar
//!
//! Each client operation is wrapped as a named [`Tool`] with a JSON schema
//! input contract. [`ToolSystem`] validates arguments against that schema,
//! logs the call and delegates. Results pass through untouched.

use crate::api::{ApiError, ColesClient};
use crate::observability::metrics::metrics;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn, Instrument};

pub mod builtin;

/// A named operation exposed to the MCP host
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and JSON schema of the arguments
    fn describe(&self) -> ToolDescription;

    /// Run the tool; `parameters` has already been validated against the schema
    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError>;
}

#[derive(Debug, Clone)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Registry of tools keyed by name
pub struct ToolSystem {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolSystem {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register the three Coles tools around a shared client
    pub fn with_coles_client(client: Arc<ColesClient>) -> Self {
        let mut system = Self::new();
        system.register(Box::new(builtin::ProductSearchTool::new(client.clone())));
        system.register(Box::new(builtin::ProductDetailsTool::new(client)));
        system.register(Box::new(builtin::ProductSlugTool::new()));
        system
    }

    /// Register a tool, replacing any tool of the same name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.describe().name;
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(tool = %name, "Replaced previously registered tool");
        }
    }

    pub fn describe_tool(&self, tool_name: &str) -> Option<ToolDescription> {
        self.tools.get(tool_name).map(|tool| tool.describe())
    }

    /// All tool descriptions, sorted by name
    pub fn descriptions(&self) -> Vec<ToolDescription> {
        let mut descriptions: Vec<ToolDescription> =
            self.tools.values().map(|tool| tool.describe()).collect();
        descriptions.sort_by(|a, b| a.name.cmp(&b.name));
        descriptions
    }

    /// Sorted tool names
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, tool_name: &str) -> bool {
        self.tools.contains_key(tool_name)
    }

    /// Validate parameters, then execute the named tool
    pub async fn execute_tool(
        &self,
        tool_name: &str,
        parameters: &Value,
    ) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        let span = crate::tool_span!(tool = %tool_name);
        async move {
            info!(tool = %tool_name, "Tool invoked");
            let started = Instant::now();

            let result = match Self::validate_parameters(&tool.describe(), parameters) {
                Ok(()) => tool.execute(parameters).await,
                Err(e) => Err(e),
            };

            let elapsed = started.elapsed();
            metrics().tool_executed(tool_name, elapsed, result.is_ok());
            match &result {
                Ok(_) => info!(
                    tool = %tool_name,
                    duration_ms = elapsed.as_millis() as u64,
                    "Tool completed"
                ),
                Err(e) => warn!(
                    tool = %tool_name,
                    duration_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "Tool failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Validate parameters against the tool's schema
    fn validate_parameters(
        description: &ToolDescription,
        parameters: &Value,
    ) -> Result<(), ToolError> {
        let validator = jsonschema::validator_for(&description.parameters)
            .map_err(|e| ToolError::SchemaError(format!("Schema compilation error: {e}")))?;

        validator.validate(parameters).map_err(|errors| {
            let error_messages: Vec<String> = errors
                .map(|e| format!("At '{}': {}", e.instance_path, e))
                .collect();
            ToolError::ValidationError(error_messages.join("; "))
        })
    }
}

impl Default for ToolSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON schema for a parameter struct
pub fn parameters_schema<T: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema).expect("Schema should be serializable")
}

/// Deserialize validated parameters into their typed form
pub fn parse_parameters<T: DeserializeOwned>(parameters: &Value) -> Result<T, ToolError> {
    serde_json::from_value(parameters.clone())
        .map_err(|e| ToolError::ValidationError(e.to_string()))
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Parameter validation failed: {0}")]
    ValidationError(String),
    #[error("Schema error: {0}")]
    SchemaError(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}
