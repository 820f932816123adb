use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error};

use crate::bridge::Bridge;
use crate::error::BridgeError;

pub const SERVER_NAME: &str = "wcnpl-wp-abilities";

#[derive(Clone)]
pub struct McpServer {
    bridge: Arc<Bridge>,
}

impl McpServer {
    pub fn new(bridge: Bridge) -> Self {
        Self {
            bridge: Arc::new(bridge),
        }
    }

    /// Bridge tool definitions as MCP tools.
    pub fn tools(&self) -> Vec<Tool> {
        self.bridge
            .tools()
            .into_iter()
            .map(|def| {
                let schema = match def.input_schema {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                Tool::new(def.name, def.description, Arc::new(schema))
            })
            .collect()
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "tool call");
        let arguments = request.arguments.map(Value::Object);

        match self.bridge.call_tool(&request.name, arguments).await {
            Ok(result) => {
                let text = serde_json::to_string_pretty(&result)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e @ BridgeError::UnknownTool(_)) => Err(McpError::invalid_params(e.to_string(), None)),
            Err(e) => {
                error!(tool = %request.name, error = %e, "tool call failed");
                Err(McpError::internal_error(e.to_string(), None))
            }
        }
    }
}
