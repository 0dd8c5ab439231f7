//! MCP server: tool and resource registry plus request dispatch

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::mcp::protocol::{
    error_codes, JsonRpcRequest, JsonRpcResponse, McpResourceContents, McpResourceDefinition,
    McpResourceRead, McpToolCall, McpToolDefinition, McpToolResult,
};
use crate::Result;

/// Trait for MCP tools
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (must be unique)
    fn name(&self) -> &str;

    /// Tool description
    fn description(&self) -> &str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool with given arguments
    async fn execute(&self, arguments: Value) -> Result<McpToolResult>;
}

/// Trait for static, read-only MCP resources
pub trait McpResource: Send + Sync {
    /// Resource URI (must be unique)
    fn uri(&self) -> &str;

    /// Short human-readable name
    fn name(&self) -> &str;

    /// Resource description
    fn description(&self) -> &str;

    /// MIME type of the contents
    fn mime_type(&self) -> &str {
        "text/plain"
    }

    /// Read the resource contents
    fn read(&self) -> String;
}

/// MCP server managing tools and resources and handling JSON-RPC requests
pub struct McpServer {
    tools: RwLock<HashMap<String, Arc<dyn McpTool>>>,
    resources: RwLock<HashMap<String, Arc<dyn McpResource>>>,
    server_name: String,
    server_version: String,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
            resources: RwLock::new(HashMap::new()),
            server_name: name.into(),
            server_version: version.into(),
        }
    }

    /// Register a tool
    pub async fn register_tool(&self, tool: Arc<dyn McpTool>) {
        let mut tools = self.tools.write().await;
        tools.insert(tool.name().to_string(), tool);
    }

    /// Register a resource
    pub async fn register_resource(&self, resource: Arc<dyn McpResource>) {
        let mut resources = self.resources.write().await;
        resources.insert(resource.uri().to_string(), resource);
    }

    /// Handle an incoming JSON-RPC request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id).await,
            "tools/list" => self.handle_list_tools(request.id).await,
            "tools/call" => self.handle_call_tool(request.id, request.params).await,
            "resources/list" => self.handle_list_resources(request.id).await,
            "resources/read" => self.handle_read_resource(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown method: {}", request.method),
            ),
        }
    }

    async fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {},
                    "resources": {}
                },
                "serverInfo": {
                    "name": self.server_name,
                    "version": self.server_version
                }
            }),
        )
    }

    async fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools = self.tools.read().await;
        let tool_defs: Vec<McpToolDefinition> = tools
            .values()
            .map(|t| McpToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect();

        JsonRpcResponse::success(id, serde_json::json!({ "tools": tool_defs }))
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params = match params {
            Some(p) => p,
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing params for tools/call",
                );
            }
        };

        let call: McpToolCall = match serde_json::from_value(params) {
            Ok(c) => c,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tool call params: {}", e),
                );
            }
        };

        let tools = self.tools.read().await;
        let tool = match tools.get(&call.name) {
            Some(t) => Arc::clone(t),
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("Unknown tool: {}", call.name),
                );
            }
        };

        // Release lock before executing tool
        drop(tools);

        // A failing tool still produces a successful JSON-RPC response with an
        // in-band error result; faults never cross the service boundary.
        match tool.execute(call.arguments).await {
            Ok(result) => match serde_json::to_value(result) {
                Ok(v) => JsonRpcResponse::success(id, v),
                Err(e) => JsonRpcResponse::error(
                    id,
                    error_codes::INTERNAL_ERROR,
                    format!("Failed to serialize tool result: {}", e),
                ),
            },
            Err(e) => match serde_json::to_value(McpToolResult::error(e.to_string())) {
                Ok(v) => JsonRpcResponse::success(id, v),
                Err(ser_err) => JsonRpcResponse::error(
                    id,
                    error_codes::INTERNAL_ERROR,
                    format!("Tool error: {}; serialization failed: {}", e, ser_err),
                ),
            },
        }
    }

    async fn handle_list_resources(&self, id: Option<Value>) -> JsonRpcResponse {
        let resources = self.resources.read().await;
        let defs: Vec<McpResourceDefinition> = resources
            .values()
            .map(|r| McpResourceDefinition {
                uri: r.uri().to_string(),
                name: r.name().to_string(),
                description: r.description().to_string(),
                mime_type: r.mime_type().to_string(),
            })
            .collect();

        JsonRpcResponse::success(id, serde_json::json!({ "resources": defs }))
    }

    async fn handle_read_resource(
        &self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let read: McpResourceRead = match params.map(serde_json::from_value) {
            Some(Ok(r)) => r,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid resource read params: {}", e),
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing params for resources/read",
                );
            }
        };

        let resources = self.resources.read().await;
        let resource = match resources.get(&read.uri) {
            Some(r) => Arc::clone(r),
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("Unknown resource: {}", read.uri),
                );
            }
        };
        drop(resources);

        let contents = McpResourceContents {
            uri: resource.uri().to_string(),
            mime_type: resource.mime_type().to_string(),
            text: resource.read(),
        };

        JsonRpcResponse::success(id, serde_json::json!({ "contents": [contents] }))
    }
}
