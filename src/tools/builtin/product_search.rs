//! `fetch_product_data` tool

use crate::api::ColesClient;
use crate::tools::{parameters_schema, parse_parameters, Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const TOOL_NAME: &str = "fetch_product_data";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProductSearchParameters {
    /// Free-text product search, e.g. "full cream milk"
    pub query: String,
}

/// Product search over the Coles catalogue
pub struct ProductSearchTool {
    client: Arc<ColesClient>,
}

impl ProductSearchTool {
    pub fn new(client: Arc<ColesClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ProductSearchTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: TOOL_NAME.to_string(),
            description: "Fetch product data from Coles API based on the query.".to_string(),
            parameters: parameters_schema::<ProductSearchParameters>(),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let params: ProductSearchParameters = parse_parameters(parameters)?;
        Ok(self.client.search(&params.query).await?)
    }
}
