//! Batch aggregation of assessment results
//!
//! Classifies free-form result text by substring match rather than exact
//! category strings, because the upstream analysis step may embed the
//! category inside a longer narrative.

use serde::{Deserialize, Serialize};

/// Bucket a result text lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Blocked,
    Allowed,
    Review,
    Unrecognized,
}

/// Classify result text, case-insensitively, by substring.
///
/// Priority order is block > allow > review: a text containing several
/// category words classifies as the highest-priority one.
pub fn classify(result_text: &str) -> Decision {
    let text = result_text.to_lowercase();
    if text.contains("block") {
        Decision::Blocked
    } else if text.contains("allow") {
        Decision::Allowed
    } else if text.contains("review") {
        Decision::Review
    } else {
        Decision::Unrecognized
    }
}

/// Summary counts over one batch.
///
/// Invariant: `blocked + allowed + review + unrecognized == total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub total: usize,
    pub blocked: usize,
    pub allowed: usize,
    pub review: usize,
    pub unrecognized: usize,
}

/// Aggregated batch outcome: counts plus the URLs in each bucket, in
/// input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub counts: SummaryCounts,
    pub blocked_urls: Vec<String>,
    pub allowed_urls: Vec<String>,
    pub review_urls: Vec<String>,
    pub unrecognized_urls: Vec<String>,
}

impl BatchSummary {
    /// Classify and count one `(url, result_text)` pair.
    pub fn record(&mut self, url: impl Into<String>, result_text: &str) -> Decision {
        let decision = classify(result_text);
        let url = url.into();
        self.counts.total += 1;
        match decision {
            Decision::Blocked => {
                self.counts.blocked += 1;
                self.blocked_urls.push(url);
            }
            Decision::Allowed => {
                self.counts.allowed += 1;
                self.allowed_urls.push(url);
            }
            Decision::Review => {
                self.counts.review += 1;
                self.review_urls.push(url);
            }
            Decision::Unrecognized => {
                self.counts.unrecognized += 1;
                self.unrecognized_urls.push(url);
            }
        }
        decision
    }
}

/// Aggregate an ordered sequence of `(url, result_text)` pairs.
pub fn summarize<I, U, T>(pairs: I) -> BatchSummary
where
    I: IntoIterator<Item = (U, T)>,
    U: Into<String>,
    T: AsRef<str>,
{
    let mut summary = BatchSummary::default();
    for (url, text) in pairs {
        summary.record(url, text.as_ref());
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_exact_categories() {
        assert_eq!(classify("block"), Decision::Blocked);
        assert_eq!(classify("allow"), Decision::Allowed);
        assert_eq!(classify("review"), Decision::Review);
        assert_eq!(classify("error"), Decision::Unrecognized);
    }

    #[test]
    fn test_classify_is_case_insensitive_substring() {
        assert_eq!(classify("URL BLOCKED"), Decision::Blocked);
        assert_eq!(classify("please allow"), Decision::Allowed);
        assert_eq!(classify("needs REVIEW"), Decision::Review);
        assert_eq!(classify("nonsense"), Decision::Unrecognized);
    }

    #[test]
    fn test_classify_priority_block_over_allow() {
        assert_eq!(
            classify("we should block this, do not allow it"),
            Decision::Blocked
        );
        assert_eq!(classify("allow after review"), Decision::Allowed);
    }

    #[test]
    fn test_summarize_sample_batch() {
        let summary = summarize(vec![
            ("https://a", "URL BLOCKED"),
            ("https://b", "please allow"),
            ("https://c", "needs REVIEW"),
            ("https://d", "nonsense"),
        ]);
        assert_eq!(
            summary.counts,
            SummaryCounts {
                total: 4,
                blocked: 1,
                allowed: 1,
                review: 1,
                unrecognized: 1,
            }
        );
        assert_eq!(summary.blocked_urls, vec!["https://a"]);
        assert_eq!(summary.unrecognized_urls, vec!["https://d"]);
    }

    #[test]
    fn test_counts_conservation() {
        let texts = ["block", "block", "allow", "review", "???", "error", "ALLOW"];
        let summary = summarize(texts.iter().enumerate().map(|(i, t)| (format!("u{i}"), *t)));
        let c = &summary.counts;
        assert_eq!(c.blocked + c.allowed + c.review + c.unrecognized, c.total);
        assert_eq!(c.total, texts.len());
    }

    #[test]
    fn test_empty_batch() {
        let summary = summarize(Vec::<(String, String)>::new());
        assert_eq!(summary.counts.total, 0);
        assert!(summary.blocked_urls.is_empty());
    }

    #[test]
    fn test_record_preserves_input_order() {
        let mut summary = BatchSummary::default();
        summary.record("https://x", "block");
        summary.record("https://y", "also block");
        assert_eq!(summary.blocked_urls, vec!["https://x", "https://y"]);
    }
}
