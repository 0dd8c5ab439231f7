//! Error types for sevgate-core

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using sevgate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for sevgate
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(sevgate::config))]
    Config(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(sevgate::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(sevgate::serde))]
    Serde(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    #[diagnostic(code(sevgate::toml))]
    Toml(#[from] toml::de::Error),

    #[error("Transport error: {0}")]
    #[diagnostic(code(sevgate::transport))]
    Transport(String),

    #[error("Tool execution error: {0}")]
    #[diagnostic(code(sevgate::tool))]
    Tool(String),
}
