//! End-to-end assessment exchange: real HTTP service, real client

use std::sync::Arc;

use sevgate_core::client::{AnalysisRecord, AssessmentClient, ClientOutcome};
use sevgate_core::config::EndpointConfig;
use sevgate_core::mcp::tools::{AssessSeverityTool, GuidelinesResource, HealthCheckTool};
use sevgate_core::mcp::{HttpMcpServer, McpServer};

async fn start_service() -> (HttpMcpServer, AssessmentClient) {
    let server = Arc::new(McpServer::new("sevgate", "0.1.0"));
    server.register_tool(Arc::new(AssessSeverityTool)).await;
    server.register_tool(Arc::new(HealthCheckTool)).await;
    server.register_resource(Arc::new(GuidelinesResource)).await;

    let http = HttpMcpServer::start(server).await.expect("server start");
    let client = AssessmentClient::new(EndpointConfig {
        host: "127.0.0.1".to_string(),
        port: http.port(),
    });
    (http, client)
}

#[tokio::test]
async fn round_trip_blocks_high_score() {
    let (http, client) = start_service().await;

    let outcome = client
        .request_assessment(AnalysisRecord::new("https://malware.test/payload.exe", 0.93))
        .await;
    let assessment = outcome.assessment().expect("assessed");
    assert_eq!(assessment.url, "https://malware.test/payload.exe");
    assert_eq!(assessment.confidence_score, 0.93);
    assert_eq!(assessment.result, "block");

    http.shutdown().await;
}

#[tokio::test]
async fn round_trip_boundary_scores() {
    let (http, client) = start_service().await;

    let review = client
        .request_assessment(AnalysisRecord::new("https://a", 0.8))
        .await;
    assert_eq!(review.assessment().unwrap().result, "review");

    let allow = client
        .request_assessment(AnalysisRecord::new("https://a", 0.5))
        .await;
    assert_eq!(allow.assessment().unwrap().result, "allow");

    http.shutdown().await;
}

#[tokio::test]
async fn round_trip_json_string_input_defaults_score() {
    let (http, client) = start_service().await;

    // No confidence_score in the record: defaults to 0.5, which allows
    let outcome = client
        .request_assessment(r#"{"url": "https://unscored.test"}"#)
        .await;
    let assessment = outcome.assessment().expect("assessed");
    assert_eq!(assessment.confidence_score, 0.5);
    assert_eq!(assessment.result, "allow");

    http.shutdown().await;
}

#[tokio::test]
async fn out_of_range_score_is_in_band_error_category() {
    let (http, client) = start_service().await;

    // The exchange itself succeeds; only the semantic judgment failed
    let outcome = client
        .request_assessment(AnalysisRecord::new("https://a", 1.7))
        .await;
    let assessment = outcome.assessment().expect("assessed, not failed");
    assert_eq!(assessment.result, "error");
    assert_eq!(assessment.confidence_score, 1.7);

    http.shutdown().await;
}

#[tokio::test]
async fn repeated_identical_requests_agree() {
    let (http, client) = start_service().await;

    let record = AnalysisRecord::new("https://same.test", 0.66);
    let first = client.request_assessment(record.clone()).await;
    let second = client.request_assessment(record).await;
    assert_eq!(first, second);
    assert_eq!(first.assessment().unwrap().result, "review");

    http.shutdown().await;
}

#[tokio::test]
async fn batch_of_outcomes_aggregates() {
    let (http, client) = start_service().await;

    let inputs = [
        ("https://example.com", 0.1),
        ("https://malware.com/download.exe", 0.95),
        ("https://phishing-site.net/fake-login", 0.7),
        ("https://legitimate-site.org", 0.2),
    ];

    let mut pairs = Vec::new();
    for (url, score) in inputs {
        let outcome = client
            .request_assessment(AnalysisRecord::new(url, score))
            .await;
        let text = match &outcome {
            ClientOutcome::Assessed(a) => a.result.clone(),
            ClientOutcome::Failed { error } => error.clone(),
        };
        pairs.push((url.to_string(), text));
    }

    let summary = sevgate_core::summary::summarize(pairs);
    assert_eq!(summary.counts.total, 4);
    assert_eq!(summary.counts.blocked, 1);
    assert_eq!(summary.counts.allowed, 2);
    assert_eq!(summary.counts.review, 1);
    assert_eq!(summary.counts.unrecognized, 0);
    assert_eq!(summary.blocked_urls, vec!["https://malware.com/download.exe"]);

    http.shutdown().await;
}

#[tokio::test]
async fn shut_down_service_maps_to_connection_refused() {
    let (http, client) = start_service().await;
    let authority = client.endpoint().authority();
    http.shutdown().await;

    // The accept loop races the shutdown signal; give it a moment to wind down
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let outcome = client
        .request_assessment(AnalysisRecord::new("https://a", 0.9))
        .await;
    let expected = format!(
        "Connection refused: assessment server is not running on {}",
        authority
    );
    assert_eq!(outcome.error().unwrap(), expected);
}
