//! Mock implementations for testing
//!
//! `MockTool` stands in for a real tool so the server and transport can be
//! exercised without an upstream API.

use crate::api::ApiError;
use crate::config::ApiConfig;
use crate::tools::{Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock tool returning a canned value or failing with a canned message
#[derive(Debug, Clone)]
pub struct MockTool {
    name: String,
    response: Result<Value, String>,
    pub calls: Arc<Mutex<Vec<Value>>>,
}

impl MockTool {
    pub fn new(name: &str, response: Value) -> Self {
        Self {
            name: name.to_string(),
            response: Ok(response),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock whose every call fails with an `InvalidInput` carrying `message`
    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            response: Err(message.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn get_calls(&self) -> Vec<Value> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Tool for MockTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: self.name.clone(),
            description: format!("Mock tool {}", self.name),
            parameters: json!({"type": "object"}),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        self.calls.lock().await.push(parameters.clone());
        match &self.response {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(ToolError::Api(ApiError::invalid_input(message.clone()))),
        }
    }
}

/// API config pointing at a mock server origin
pub fn test_api_config(origin: &str) -> ApiConfig {
    ApiConfig {
        origin: origin.to_string(),
        build_id: "test-build".to_string(),
        locale: "en".to_string(),
        timeout_ms: 2_000,
        ..Default::default()
    }
}

/// Data path prefix matching [`test_api_config`]
pub const TEST_DATA_PREFIX: &str = "/_next/data/test-build/en";
