//! Assessment client
//!
//! Performs the single request/response exchange against the assessment
//! service and classifies everything that can go wrong into a data value.
//! The entry point is total: it always returns a [`ClientOutcome`], never
//! an error, so one bad URL cannot abort a batch run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EndpointConfig;
use crate::engine::AssessmentRequest;
use crate::mcp::{JsonRpcRequest, JsonRpcResponse, McpContent, McpToolResult};

/// Score assumed when the analysis step did not supply one.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Structured analysis record produced by the upstream analysis step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

impl AnalysisRecord {
    pub fn new(url: impl Into<String>, confidence_score: f64) -> Self {
        Self {
            url: Some(url.into()),
            confidence_score: Some(confidence_score),
        }
    }
}

/// Input accepted by [`AssessmentClient::request_assessment`]: either an
/// already-structured record or JSON text that still needs parsing.
#[derive(Debug, Clone)]
pub enum AnalysisInput {
    Record(AnalysisRecord),
    Json(String),
}

impl From<AnalysisRecord> for AnalysisInput {
    fn from(record: AnalysisRecord) -> Self {
        AnalysisInput::Record(record)
    }
}

impl From<String> for AnalysisInput {
    fn from(text: String) -> Self {
        AnalysisInput::Json(text)
    }
}

impl From<&str> for AnalysisInput {
    fn from(text: &str) -> Self {
        AnalysisInput::Json(text.to_string())
    }
}

/// Normalized successful assessment returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub url: String,
    pub confidence_score: f64,
    pub result: String,
}

/// Total outcome of one client call: an assessment or a description of why
/// none could be obtained. Exactly one variant is ever populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClientOutcome {
    Assessed(Assessment),
    Failed { error: String },
}

impl ClientOutcome {
    fn failed(message: impl Into<String>) -> Self {
        ClientOutcome::Failed {
            error: message.into(),
        }
    }

    /// The assessment, if the exchange succeeded.
    pub fn assessment(&self) -> Option<&Assessment> {
        match self {
            ClientOutcome::Assessed(a) => Some(a),
            ClientOutcome::Failed { .. } => None,
        }
    }

    /// The error description, if the exchange failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ClientOutcome::Assessed(_) => None,
            ClientOutcome::Failed { error } => Some(error),
        }
    }
}

/// Client for the severity assessment service.
///
/// Performs exactly one exchange per call; no retry, no backoff, no
/// timeout beyond the transport default. Callers wanting bounded latency
/// impose their own deadline.
pub struct AssessmentClient {
    endpoint: EndpointConfig,
    http: reqwest::Client,
}

impl AssessmentClient {
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self {
            endpoint,
            http: reqwest::Client::new(),
        }
    }

    /// The endpoint this client dials.
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Request a severity assessment for one analysis record.
    ///
    /// Input validation failures (unparseable JSON, missing url) are
    /// reported without any network activity.
    pub async fn request_assessment(&self, input: impl Into<AnalysisInput>) -> ClientOutcome {
        let record = match parse_input(input.into()) {
            Ok(record) => record,
            Err(outcome) => return outcome,
        };

        let url = match record.url.filter(|u| !u.is_empty()) {
            Some(url) => url,
            None => return ClientOutcome::failed("Missing required field: url"),
        };
        let confidence_score = record.confidence_score.unwrap_or(DEFAULT_CONFIDENCE);

        self.exchange(AssessmentRequest {
            url,
            confidence_score,
        })
        .await
    }

    /// The single request/response exchange, with every failure condition
    /// mapped to a descriptive error string.
    async fn exchange(&self, assessment: AssessmentRequest) -> ClientOutcome {
        let request = JsonRpcRequest::new("tools/call").with_id(1).with_params(
            serde_json::json!({
                "name": "assess_severity",
                "arguments": assessment
            }),
        );

        let endpoint_url = format!("http://{}", self.endpoint.authority());
        let response = match self.http.post(endpoint_url).json(&request).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                return ClientOutcome::failed(format!(
                    "Connection refused: assessment server is not running on {}",
                    self.endpoint.authority()
                ));
            }
            Err(e) => return ClientOutcome::failed(format!("Unexpected error: {}", e)),
        };
        let AssessmentRequest {
            url,
            confidence_score,
        } = assessment;

        let status = response.status();
        if !status.is_success() {
            return ClientOutcome::failed(format!("Server returned status {}", status.as_u16()));
        }

        let rpc: JsonRpcResponse = match response.json().await {
            Ok(rpc) => rpc,
            Err(e) if e.is_decode() => {
                return ClientOutcome::failed("Invalid JSON response from server");
            }
            Err(e) => return ClientOutcome::failed(format!("Unexpected error: {}", e)),
        };

        if let Some(err) = rpc.error {
            return ClientOutcome::failed(format!("Unexpected error: {}", err.message));
        }

        match extract_payload(rpc.result) {
            Ok(payload) => {
                ClientOutcome::Assessed(normalize_payload(payload, &url, confidence_score))
            }
            Err(outcome) => outcome,
        }
    }
}

/// Explicit parse step for the JSON-text input arm.
fn parse_input(input: AnalysisInput) -> std::result::Result<AnalysisRecord, ClientOutcome> {
    match input {
        AnalysisInput::Record(record) => Ok(record),
        AnalysisInput::Json(text) => serde_json::from_str(&text).map_err(|_| {
            ClientOutcome::failed(
                "Invalid input: analysis data must be a record or a valid JSON string",
            )
        }),
    }
}

/// Pull the tool payload out of the JSON-RPC result envelope.
fn extract_payload(result: Option<Value>) -> std::result::Result<Value, ClientOutcome> {
    let invalid = || ClientOutcome::failed("Invalid JSON response from server");

    let result = result.ok_or_else(invalid)?;
    let tool: McpToolResult = serde_json::from_value(result).map_err(|_| invalid())?;

    if tool.is_error == Some(true) {
        let message = tool
            .content
            .as_deref()
            .and_then(|c| c.first())
            .map(|McpContent::Text { text }| text.clone())
            .unwrap_or_else(|| "tool call failed".to_string());
        return Err(ClientOutcome::failed(format!(
            "Unexpected error: {}",
            message
        )));
    }

    let content = tool.content.ok_or_else(invalid)?;
    let McpContent::Text { text } = content.first().ok_or_else(invalid)?;
    serde_json::from_str(text).map_err(|_| invalid())
}

/// Apply the leniency policy: any field the service omitted falls back to
/// the request's value, and a missing `result` becomes the literal "null".
fn normalize_payload(payload: Value, url: &str, confidence_score: f64) -> Assessment {
    Assessment {
        url: payload
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or(url)
            .to_string(),
        confidence_score: payload
            .get("confidence_score")
            .and_then(Value::as_f64)
            .unwrap_or(confidence_score),
        result: payload
            .get("result")
            .and_then(Value::as_str)
            .unwrap_or("null")
            .to_string(),
    }
}
