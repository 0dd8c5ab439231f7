//! MCP tool exposing the severity decision engine

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::engine;
use crate::mcp::{McpTool, McpToolResult};
use crate::Result;

/// Severity assessment tool: `(url, confidence_score)` in, categorical
/// decision out. Every failure mode resolves to an in-band "error" category
/// rather than a protocol fault.
pub struct AssessSeverityTool;

#[derive(Debug, Deserialize)]
struct AssessSeverityArgs {
    url: String,
    // Left as a raw value so a wrong-typed score can be echoed back
    // unchanged in the error payload.
    #[serde(default)]
    confidence_score: Value,
}

#[async_trait]
impl McpTool for AssessSeverityTool {
    fn name(&self) -> &str {
        "assess_severity"
    }

    fn description(&self) -> &str {
        "Assess URL severity from a confidence score between 0 and 1. Returns block, review, allow, or error."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": { "type": "string" },
                "confidence_score": { "type": "number" }
            },
            "required": ["url", "confidence_score"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<McpToolResult> {
        let args: AssessSeverityArgs = match serde_json::from_value(arguments) {
            Ok(a) => a,
            Err(e) => {
                return Ok(McpToolResult::error(format!(
                    "Invalid assess_severity arguments: {}",
                    e
                )));
            }
        };

        let payload = match args.confidence_score.as_f64() {
            Some(score) => serde_json::to_value(engine::assess(args.url, score))?,
            // Non-numeric score: echo it back unchanged with category "error"
            None => serde_json::json!({
                "url": args.url,
                "confidence_score": args.confidence_score,
                "result": "error"
            }),
        };

        Ok(McpToolResult::text(payload.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::mcp::McpContent;

    async fn run(arguments: Value) -> Value {
        let result = AssessSeverityTool.execute(arguments).await.unwrap();
        let McpContent::Text { text } = &result.content.unwrap()[0];
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_blocks_high_score() {
        let payload = run(serde_json::json!({
            "url": "https://phish.test/login",
            "confidence_score": 0.97
        }))
        .await;
        assert_eq!(payload["result"], "block");
        assert_eq!(payload["url"], "https://phish.test/login");
        assert_eq!(payload["confidence_score"], 0.97);
    }

    #[tokio::test]
    async fn test_boundary_score_reviews() {
        let payload = run(serde_json::json!({
            "url": "https://a",
            "confidence_score": 0.8
        }))
        .await;
        assert_eq!(payload["result"], "review");
    }

    #[tokio::test]
    async fn test_out_of_range_score_errors_in_band() {
        let payload = run(serde_json::json!({
            "url": "https://a",
            "confidence_score": 2.0
        }))
        .await;
        assert_eq!(payload["result"], "error");
        assert_eq!(payload["confidence_score"], 2.0);
    }

    #[tokio::test]
    async fn test_wrong_typed_score_echoed_with_error() {
        let payload = run(serde_json::json!({
            "url": "https://a",
            "confidence_score": "very high"
        }))
        .await;
        assert_eq!(payload["result"], "error");
        assert_eq!(payload["confidence_score"], "very high");
        assert_eq!(payload["url"], "https://a");
    }

    #[tokio::test]
    async fn test_missing_url_is_tool_error_not_panic() {
        let result = AssessSeverityTool
            .execute(serde_json::json!({ "confidence_score": 0.4 }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}
