//! MCP server handler
//!
//! [`McpServer`] adapts the [`ToolSystem`] to rmcp's [`ServerHandler`]. rmcp
//! owns framing, request ids and the session lifecycle; this module answers
//! `initialize`, `tools/list` and `tools/call`.
//!
//! Tool failures are returned inside a successful `tools/call` result with
//! `isError: true` so the host's model can see them. An unknown tool name is a
//! JSON-RPC invalid-params error.

use crate::config::ServerSection;
use crate::error::sanitize_error_message;
use crate::observability::metrics::metrics;
use crate::tools::{ToolDescription, ToolError, ToolSystem};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ClientInfo, Content, ErrorData as McpError,
    Implementation, JsonObject, ListToolsResult, PaginatedRequestParams, ProtocolVersion,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::ServerHandler;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

/// Protocol revisions echoed back when a client asks for one of them
fn supported_protocol_versions() -> [ProtocolVersion; 3] {
    [
        ProtocolVersion::V_2025_06_18,
        ProtocolVersion::V_2025_03_26,
        ProtocolVersion::V_2024_11_05,
    ]
}

/// The client's requested revision if supported, else the latest
pub fn negotiate_protocol_version(requested: &ProtocolVersion) -> ProtocolVersion {
    if supported_protocol_versions().contains(requested) {
        requested.clone()
    } else {
        ProtocolVersion::LATEST
    }
}

pub struct McpServer {
    tools: ToolSystem,
    server_info: Implementation,
    instructions: Option<String>,
}

impl McpServer {
    pub fn new(tools: ToolSystem, section: &ServerSection) -> Self {
        Self {
            tools,
            server_info: Implementation {
                name: section.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: section.instructions.clone(),
        }
    }

    fn info(&self, protocol_version: ProtocolVersion) -> ServerInfo {
        ServerInfo {
            protocol_version,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: self.server_info.clone(),
            instructions: self.instructions.clone(),
            ..Default::default()
        }
    }

    async fn run_tool(&self, name: &str, arguments: Value) -> Result<CallToolResult, McpError> {
        if !self.tools.contains(name) {
            return Err(McpError::invalid_params(format!("Unknown tool: {name}"), None));
        }

        match self.tools.execute_tool(name, &arguments).await {
            Ok(value) => Ok(tool_output(value)),
            Err(ToolError::UnknownTool(name)) => Err(McpError::invalid_params(
                format!("Unknown tool: {name}"),
                None,
            )),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(
                sanitize_error_message(&e.to_string()),
            )])),
        }
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        self.info(ProtocolVersion::LATEST)
    }

    async fn initialize(
        &self,
        request: ClientInfo,
        _context: RequestContext<RoleServer>,
    ) -> Result<ServerInfo, McpError> {
        metrics().request_received();
        let protocol_version = negotiate_protocol_version(&request.protocol_version);
        info!(
            client = %request.client_info.name,
            client_version = %request.client_info.version,
            protocol_version = ?protocol_version,
            "Client connected"
        );
        Ok(self.info(protocol_version))
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        metrics().request_received();
        let tools: Vec<Tool> = self
            .tools
            .descriptions()
            .into_iter()
            .map(to_mcp_tool)
            .collect();
        debug!(count = tools.len(), "Listing tools");
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        metrics().request_received();
        let name = request.name.to_string();
        let span = crate::request_span!(method = "tools/call", tool = %name);

        async move {
            let arguments = Value::Object(request.arguments.unwrap_or_default());
            let result = self.run_tool(&name, arguments).await;
            if let Err(error) = &result {
                metrics().request_failed();
                warn!(code = error.code.0, message = %error.message, "Request failed");
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Convert a registry description into the MCP tool listing entry
pub fn to_mcp_tool(description: ToolDescription) -> Tool {
    let schema = match description.parameters {
        Value::Object(schema) => schema,
        _ => JsonObject::new(),
    };
    Tool::new(description.name, description.description, Arc::new(schema))
}

/// Strings are sent verbatim; other values as JSON text, objects also as
/// structured content
pub fn tool_output(value: Value) -> CallToolResult {
    match value {
        Value::String(text) => CallToolResult::success(vec![Content::text(text)]),
        Value::Object(_) => {
            let mut result = CallToolResult::success(vec![Content::text(value.to_string())]);
            result.structured_content = Some(value);
            result
        }
        other => CallToolResult::success(vec![Content::text(other.to_string())]),
    }
}
