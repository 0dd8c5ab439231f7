//! MCP stdio transport layer
//!
//! Newline-delimited JSON-RPC: one request per line in, one response per
//! line out. This is the transport the assessment service runs on when
//! spawned as a subprocess by an orchestrator.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::mcp::protocol::{error_codes, JsonRpcRequest, JsonRpcResponse};
use crate::mcp::McpServer;
use crate::{Error, Result};

/// Read the next JSON-RPC message. Blank lines are skipped; `Ok(None)`
/// means EOF.
pub async fn read_message<R: AsyncBufRead + Unpin>(
    reader: &mut R,
) -> Result<Option<JsonRpcRequest>> {
    loop {
        let mut line = String::new();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| Error::Transport(format!("Failed to read MCP message: {}", e)))?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = serde_json::from_str(line)
            .map_err(|e| Error::Transport(format!("Failed to parse MCP request: {}", e)))?;

        return Ok(Some(request));
    }
}

/// Write a JSON-RPC response followed by a newline and flush.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| Error::Transport(format!("Failed to serialize MCP response: {}", e)))?;

    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| Error::Transport(format!("Failed to write MCP response: {}", e)))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| Error::Transport(format!("Failed to write MCP response: {}", e)))?;
    writer
        .flush()
        .await
        .map_err(|e| Error::Transport(format!("Failed to flush MCP response: {}", e)))?;

    Ok(())
}

/// Serve JSON-RPC over an arbitrary reader/writer pair until EOF.
///
/// Unparseable lines get a PARSE_ERROR response instead of tearing down
/// the connection.
pub async fn serve_connection<R, W>(
    server: Arc<McpServer>,
    mut reader: R,
    mut writer: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let request = match read_message(&mut reader).await {
            Ok(Some(req)) => req,
            Ok(None) => {
                debug!("MCP stdio transport reached EOF, shutting down");
                return Ok(());
            }
            Err(e) => {
                let response =
                    JsonRpcResponse::error(None, error_codes::PARSE_ERROR, e.to_string());
                write_message(&mut writer, &response).await?;
                continue;
            }
        };

        let response = server.handle_request(request).await;
        write_message(&mut writer, &response).await?;
    }
}

/// Serve the MCP server over stdin/stdout until EOF.
pub async fn serve_stdio(server: Arc<McpServer>) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve_connection(server, reader, writer).await
}
