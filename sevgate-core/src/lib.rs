//! sevgate-core: URL severity assessment gateway library

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod mcp;
pub mod summary;

pub use error::{Error, Result};
