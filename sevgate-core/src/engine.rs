//! Threshold-based severity decision engine
//!
//! Maps a URL and a confidence score onto one of three actions using fixed
//! policy thresholds. Pure and stateless, so it can be called concurrently
//! without coordination.

use serde::{Deserialize, Serialize};

/// Scores strictly above this are blocked.
pub const BLOCK_THRESHOLD: f64 = 0.8;

/// Scores strictly above this (and at most [`BLOCK_THRESHOLD`]) go to review.
pub const REVIEW_THRESHOLD: f64 = 0.5;

/// Human-readable description of the threshold policy, published by the
/// assessment service as a static resource.
pub const GUIDELINES: &str = "\
Severity Assessment Guidelines:
- Confidence Score > 0.8: BLOCK (High threat)
- Confidence Score > 0.5: REVIEW (Medium threat)
- Confidence Score <= 0.5: ALLOW (Low threat)
";

/// Outcome category of a severity assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Allow,
    Review,
    Block,
    /// Validation failure: the exchange succeeded but the score was not a
    /// usable value. Terminal category, never a raised fault.
    Error,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Allow => "allow",
            Category::Review => "review",
            Category::Block => "block",
            Category::Error => "error",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single assessment request: one URL and its estimated threat likelihood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub url: String,
    pub confidence_score: f64,
}

/// Result of one severity assessment.
///
/// The category travels under the wire key `result`. The url and
/// confidence_score are echoed back from the request, including when the
/// score failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub url: String,
    pub confidence_score: f64,
    #[serde(rename = "result")]
    pub category: Category,
}

/// Assess a URL's severity from its confidence score.
///
/// Scores outside `[0, 1]` (including NaN) yield [`Category::Error`] with
/// the inputs echoed unchanged; this function never fails.
pub fn assess(url: impl Into<String>, confidence_score: f64) -> AssessmentResult {
    // RangeInclusive::contains is false for NaN, so that case needs no
    // separate check.
    let category = if !(0.0..=1.0).contains(&confidence_score) {
        Category::Error
    } else if confidence_score > BLOCK_THRESHOLD {
        Category::Block
    } else if confidence_score > REVIEW_THRESHOLD {
        Category::Review
    } else {
        Category::Allow
    };

    AssessmentResult {
        url: url.into(),
        confidence_score,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_score_blocks() {
        assert_eq!(assess("https://a", 0.81).category, Category::Block);
        assert_eq!(assess("https://a", 0.95).category, Category::Block);
        assert_eq!(assess("https://a", 1.0).category, Category::Block);
    }

    #[test]
    fn test_mid_score_reviews() {
        assert_eq!(assess("https://a", 0.51).category, Category::Review);
        assert_eq!(assess("https://a", 0.7).category, Category::Review);
    }

    #[test]
    fn test_low_score_allows() {
        assert_eq!(assess("https://a", 0.0).category, Category::Allow);
        assert_eq!(assess("https://a", 0.3).category, Category::Allow);
    }

    #[test]
    fn test_block_boundary_routes_to_review() {
        // Exactly 0.8 is review, not block (strict inequality)
        assert_eq!(assess("https://a", 0.8).category, Category::Review);
    }

    #[test]
    fn test_review_boundary_routes_to_allow() {
        // Exactly 0.5 is allow, not review (strict inequality)
        assert_eq!(assess("https://a", 0.5).category, Category::Allow);
    }

    #[test]
    fn test_out_of_range_score_is_error() {
        let result = assess("https://a", 1.5);
        assert_eq!(result.category, Category::Error);
        assert_eq!(result.url, "https://a");
        assert_eq!(result.confidence_score, 1.5);

        assert_eq!(assess("https://a", -0.1).category, Category::Error);
    }

    #[test]
    fn test_nan_score_is_error() {
        let result = assess("https://a", f64::NAN);
        assert_eq!(result.category, Category::Error);
        assert!(result.confidence_score.is_nan());
    }

    #[test]
    fn test_assess_is_deterministic() {
        let first = assess("https://a", 0.62);
        let second = assess("https://a", 0.62);
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_wire_format() {
        let result = assess("https://example.com", 0.9);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["confidence_score"], 0.9);
        assert_eq!(json["result"], "block");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Block.to_string(), "block");
        assert_eq!(Category::Error.to_string(), "error");
    }

    #[test]
    fn test_guidelines_mention_all_bands() {
        assert!(GUIDELINES.contains("BLOCK"));
        assert!(GUIDELINES.contains("REVIEW"));
        assert!(GUIDELINES.contains("ALLOW"));
    }
}
