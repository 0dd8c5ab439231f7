//! Static guidelines resource

use crate::engine::GUIDELINES;
use crate::mcp::McpResource;

/// Read-only resource documenting the three-tier threshold policy.
/// Informational only; the client path never reads it.
pub struct GuidelinesResource;

impl McpResource for GuidelinesResource {
    fn uri(&self) -> &str {
        "sevgate://guidelines"
    }

    fn name(&self) -> &str {
        "Severity assessment guidelines"
    }

    fn description(&self) -> &str {
        "Human-readable description of the block/review/allow thresholds"
    }

    fn read(&self) -> String {
        GUIDELINES.to_string()
    }
}
