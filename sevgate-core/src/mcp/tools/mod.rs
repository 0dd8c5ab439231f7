//! MCP tool and resource implementations for the assessment service

mod assess;
mod guidelines;
mod health;

pub use assess::AssessSeverityTool;
pub use guidelines::GuidelinesResource;
pub use health::HealthCheckTool;
