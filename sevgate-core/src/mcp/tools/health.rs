//! Liveness probe tool

use async_trait::async_trait;
use serde_json::Value;

use crate::mcp::{McpTool, McpToolResult};
use crate::Result;

/// Constant health probe with no side effects, used by collaborators for
/// liveness checks.
pub struct HealthCheckTool;

#[async_trait]
impl McpTool for HealthCheckTool {
    fn name(&self) -> &str {
        "health_check"
    }

    fn description(&self) -> &str {
        "Check that the assessment service is alive"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _arguments: Value) -> Result<McpToolResult> {
        Ok(McpToolResult::text(
            serde_json::json!({ "status": "healthy" }).to_string(),
        ))
    }
}
