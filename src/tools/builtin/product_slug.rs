//! `create_product_slug` tool

use crate::api::build_slug;
use crate::tools::{parameters_schema, parse_parameters, Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

pub const TOOL_NAME: &str = "create_product_slug";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProductSlugParameters {
    /// Product brand, e.g. "Coles"
    pub brand: String,
    /// Product name, e.g. "Full Cream Milk"
    pub name: String,
    /// Pack size, e.g. "3L"
    pub size: String,
    /// Coles product id
    pub product_id: String,
}

/// Slug builder; needs no client
#[derive(Debug, Default)]
pub struct ProductSlugTool;

impl ProductSlugTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for ProductSlugTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: TOOL_NAME.to_string(),
            description: "Create a product URL slug. To be used to create the product_slug for \
                fetch_product_details."
                .to_string(),
            parameters: parameters_schema::<ProductSlugParameters>(),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let params: ProductSlugParameters = parse_parameters(parameters)?;
        Ok(Value::String(build_slug(
            &params.brand,
            &params.name,
            &params.size,
            &params.product_id,
        )))
    }
}
