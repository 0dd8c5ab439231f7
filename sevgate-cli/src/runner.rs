//! Command execution: serve the assessment service or drive a batch run

use std::net::ToSocketAddrs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;

use sevgate_core::client::{AnalysisInput, AnalysisRecord, AssessmentClient, ClientOutcome};
use sevgate_core::config::{GatewayConfig, Transport};
use sevgate_core::mcp::tools::{AssessSeverityTool, GuidelinesResource, HealthCheckTool};
use sevgate_core::mcp::{serve_stdio, HttpMcpServer, McpServer};
use sevgate_core::summary::BatchSummary;

/// Build the assessment service with its full tool and resource set.
async fn build_server(config: &GatewayConfig) -> Arc<McpServer> {
    let server = Arc::new(McpServer::new(
        config.server.name.clone(),
        env!("CARGO_PKG_VERSION"),
    ));
    server.register_tool(Arc::new(AssessSeverityTool)).await;
    server.register_tool(Arc::new(HealthCheckTool)).await;
    server.register_resource(Arc::new(GuidelinesResource)).await;
    server
}

/// Resolve the transport choice: CLI flag wins over config.
pub fn resolve_transport(flag: Option<&str>, config: &GatewayConfig) -> Result<Transport> {
    match flag {
        None => Ok(config.server.transport),
        Some("stdio") => Ok(Transport::Stdio),
        Some("http") => Ok(Transport::Http),
        Some(other) => bail!("unknown transport '{}', expected stdio or http", other),
    }
}

/// Run the assessment service until EOF (stdio) or Ctrl-C (http).
pub async fn serve(config: &GatewayConfig, transport: Transport) -> Result<()> {
    let server = build_server(config).await;

    match transport {
        Transport::Stdio => {
            info!("serving assessments on stdio");
            serve_stdio(server).await?;
        }
        Transport::Http => {
            let addr = (config.endpoint.host.as_str(), config.endpoint.port)
                .to_socket_addrs()
                .with_context(|| format!("cannot resolve {}", config.endpoint.authority()))?
                .next()
                .with_context(|| format!("no address for {}", config.endpoint.authority()))?;
            let http = HttpMcpServer::bind(server, addr).await?;
            info!("serving assessments on {}", http.url());
            tokio::signal::ctrl_c().await?;
            http.shutdown().await;
        }
    }
    Ok(())
}

/// Assemble the batch from an input file and/or repeated --url flags.
///
/// File lines stay as raw JSON so a malformed line surfaces as that
/// record's client error instead of aborting the run. Each entry carries a
/// display label for reporting failures that never reached the service.
pub fn collect_records(
    input: Option<&Path>,
    urls: &[String],
    score: Option<f64>,
) -> Result<Vec<(String, AnalysisInput)>> {
    let mut records = Vec::new();

    if let Some(path) = input {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            records.push((label_for_line(line, idx), AnalysisInput::from(line)));
        }
    }

    for url in urls {
        let record = match score {
            Some(score) => AnalysisRecord::new(url.clone(), score),
            None => AnalysisRecord {
                url: Some(url.clone()),
                confidence_score: None,
            },
        };
        records.push((url.clone(), AnalysisInput::from(record)));
    }

    Ok(records)
}

/// Best-effort display label for a raw input line: its url field if one
/// parses out, otherwise the line number.
fn label_for_line(line: &str, idx: usize) -> String {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|v| v.get("url").and_then(|u| u.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("line {}", idx + 1))
}

/// Drive the batch: one client call per record, then print the summary.
pub async fn run_batch(
    config: &GatewayConfig,
    input: Option<&Path>,
    urls: &[String],
    score: Option<f64>,
) -> Result<()> {
    let records = collect_records(input, urls, score)?;
    if records.is_empty() {
        bail!("no analysis records to process; pass --input or --url");
    }

    let client = AssessmentClient::new(config.endpoint.clone());
    println!("Processing {} URLs...", records.len());

    let mut summary = BatchSummary::default();
    for (label, record) in records {
        let outcome = client.request_assessment(record).await;
        match &outcome {
            ClientOutcome::Assessed(a) => {
                summary.record(&a.url, &a.result);
                println!("  {} -> {}", a.url, a.result);
            }
            // Failed exchanges are counted, not dropped; their error text
            // never matches a category, so they land in unrecognized.
            ClientOutcome::Failed { error } => {
                summary.record(&label, error);
                println!("  {} -> failed: {}", label, error);
            }
        }
    }

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    let c = &summary.counts;
    println!();
    println!("SECURITY MONITORING SUMMARY");
    println!("URLs processed: {}", c.total);
    println!("  Blocked:         {}", c.blocked);
    println!("  Allowed:         {}", c.allowed);
    println!("  Review required: {}", c.review);
    println!("  Unrecognized:    {}", c.unrecognized);

    if !summary.blocked_urls.is_empty() {
        println!();
        println!("Blocked URLs:");
        for url in &summary.blocked_urls {
            println!("  - {}", url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_transport_flag_wins() {
        let config = GatewayConfig::default();
        assert_eq!(
            resolve_transport(Some("http"), &config).unwrap(),
            Transport::Http
        );
        assert_eq!(resolve_transport(None, &config).unwrap(), Transport::Stdio);
        assert!(resolve_transport(Some("smoke-signal"), &config).is_err());
    }

    #[test]
    fn test_collect_records_from_urls() {
        let urls = vec!["https://a".to_string(), "https://b".to_string()];
        let records = collect_records(None, &urls, Some(0.9)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, "https://a");
        match &records[1].1 {
            AnalysisInput::Record(r) => {
                assert_eq!(r.url.as_deref(), Some("https://b"));
                assert_eq!(r.confidence_score, Some(0.9));
            }
            AnalysisInput::Json(_) => panic!("expected structured record"),
        }
    }

    #[test]
    fn test_collect_records_from_file_keeps_raw_lines() {
        let path = std::env::temp_dir().join("sevgate-test-batch.jsonl");
        std::fs::write(
            &path,
            "{\"url\": \"https://a\", \"confidence_score\": 0.9}\n\nnot json\n",
        )
        .unwrap();

        let records = collect_records(Some(&path), &[], None).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, "https://a");
        // Malformed lines survive collection and get a positional label
        assert_eq!(records[1].0, "line 3");
        assert!(matches!(records[1].1, AnalysisInput::Json(_)));
    }

    #[test]
    fn test_label_for_line_falls_back_to_position() {
        assert_eq!(label_for_line("{\"url\": \"https://x\"}", 4), "https://x");
        assert_eq!(label_for_line("{}", 4), "line 5");
        assert_eq!(label_for_line("garbage", 0), "line 1");
    }
}
