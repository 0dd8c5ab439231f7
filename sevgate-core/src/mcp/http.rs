//! HTTP endpoint for the MCP assessment service
//!
//! Accepts JSON-RPC over HTTP POST and forwards it to the [`McpServer`].
//! This is the transport the assessment client dials.

use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::mcp::protocol::{error_codes, JsonRpcRequest};
use crate::mcp::McpServer;
use crate::Result;

/// HTTP server wrapping an MCP server.
///
/// Use [`bind()`](Self::bind) for a configured endpoint or
/// [`start()`](Self::start) for an OS-assigned port.
pub struct HttpMcpServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _task: JoinHandle<()>,
}

impl HttpMcpServer {
    /// Bind to a specific address and start accepting connections.
    pub async fn bind(server: Arc<McpServer>, addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        debug!("assessment service listening on {}", local_addr);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            Self::accept_loop(listener, server, shutdown_rx).await;
        });

        Ok(Self {
            addr: local_addr,
            shutdown_tx: Some(shutdown_tx),
            _task: task,
        })
    }

    /// Start on an OS-assigned localhost port.
    pub async fn start(server: Arc<McpServer>) -> Result<Self> {
        Self::bind(server, SocketAddr::from(([127, 0, 0, 1], 0))).await
    }

    /// The full URL of the running server (e.g. `http://127.0.0.1:9000`).
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Gracefully shut down the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Accept loop that runs until shutdown is signalled.
    async fn accept_loop(
        listener: TcpListener,
        server: Arc<McpServer>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            debug!("assessment connection from {}", addr);
                            let server = Arc::clone(&server);
                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req| {
                                    let server = Arc::clone(&server);
                                    handle_http_request(server, req)
                                });
                                if let Err(e) = http1::Builder::new()
                                    .serve_connection(io, service)
                                    .await
                                {
                                    error!("assessment connection error: {}", e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("assessment accept error: {}", e);
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    debug!("assessment service shutting down");
                    break;
                }
            }
        }
    }
}

/// Build a JSON response with the given status code and body.
fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    // Status and header are valid constants, so the builder cannot fail;
    // fall back to an empty 500 just in case.
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(bytes)))
        .unwrap_or_else(|_| {
            warn!("failed to build HTTP response, returning empty 500");
            let mut resp = Response::new(Full::new(Bytes::new()));
            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            resp
        })
}

/// Handle a single HTTP request by dispatching to the MCP server.
async fn handle_http_request(
    server: Arc<McpServer>,
    req: Request<hyper::body::Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    if req.method() != hyper::Method::POST {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": {
                "code": error_codes::INVALID_REQUEST,
                "message": "Method not allowed, use POST"
            }
        });
        return Ok(json_response(StatusCode::METHOD_NOT_ALLOWED, &body));
    }

    let body = req.collect().await?.to_bytes();

    let rpc_request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            let error_body = serde_json::json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": {
                    "code": error_codes::PARSE_ERROR,
                    "message": format!("Parse error: {e}")
                }
            });
            return Ok(json_response(StatusCode::OK, &error_body));
        }
    };

    // Notification methods need no processing
    if rpc_request.method == "notifications/initialized" || rpc_request.method == "initialized" {
        let response_body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": rpc_request.id,
            "result": {}
        });
        return Ok(json_response(StatusCode::OK, &response_body));
    }

    let rpc_response = server.handle_request(rpc_request).await;
    let body = serde_json::to_value(&rpc_response).unwrap_or_default();
    Ok(json_response(StatusCode::OK, &body))
}
