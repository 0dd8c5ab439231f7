//! MCP (Model Context Protocol) assessment service
//!
//! Exposes the decision engine as remote-callable tools plus a static
//! guidelines resource, over stdio or HTTP transports.

mod http;
mod protocol;
mod server;
pub mod tools;
mod transport;

pub use http::*;
pub use protocol::*;
pub use server::*;
pub use transport::*;
