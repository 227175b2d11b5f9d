//! `fetch_product_details` tool

use crate::api::ColesClient;
use crate::tools::{parameters_schema, parse_parameters, Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const TOOL_NAME: &str = "fetch_product_details";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProductDetailsParameters {
    /// Product slug, e.g. from create_product_slug
    pub product_slug: String,
}

/// Product detail lookup (nutrition, ingredients, ...)
pub struct ProductDetailsTool {
    client: Arc<ColesClient>,
}

impl ProductDetailsTool {
    pub fn new(client: Arc<ColesClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ProductDetailsTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: TOOL_NAME.to_string(),
            description: "Fetch detailed product information from Coles API based on the product \
                slug. This includes nutritional information, ingredients, and other details."
                .to_string(),
            parameters: parameters_schema::<ProductDetailsParameters>(),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let params: ProductDetailsParameters = parse_parameters(parameters)?;
        Ok(self.client.fetch_details(&params.product_slug).await?)
    }
}
