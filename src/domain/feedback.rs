use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::grammar::GrammarContext;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A user correction of a transcript or translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub timestamp: String,
    pub original: String,
    pub correction: String,
    /// Analysis of `original` at the time it was corrected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<GrammarContext>,
    /// Set once the correction has been folded back into the lexicon.
    #[serde(default)]
    pub processed: bool,
}

impl FeedbackEntry {
    pub fn new(original: &str, correction: &str, at: DateTime<Local>) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            original: original.to_string(),
            correction: correction.to_string(),
            context: None,
            processed: false,
        }
    }

    /// Line appended to the plaintext feedback log.
    pub fn log_line(&self) -> String {
        format!(
            "[{}] Original: \"{}\" -> Correction: \"{}\"\n",
            self.timestamp, self.original, self.correction
        )
    }
}

/// The persisted feedback document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackDocument {
    #[serde(default)]
    pub feedback: Vec<FeedbackEntry>,
}

/// Counts over the recorded corrections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackStats {
    pub total_entries: usize,
    pub processed_entries: usize,
    pub unprocessed_entries: usize,
    pub latest_feedback: Option<FeedbackEntry>,
}

impl FeedbackStats {
    pub fn from_entries(entries: &[FeedbackEntry]) -> Self {
        let processed = entries.iter().filter(|e| e.processed).count();
        Self {
            total_entries: entries.len(),
            processed_entries: processed,
            unprocessed_entries: entries.len() - processed,
            latest_feedback: entries.last().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_formats_timestamp_and_log_line() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let entry = FeedbackEntry::new("helo", "hello", at);
        assert_eq!(entry.timestamp, "2024-03-09 14:05:07");
        assert_eq!(
            entry.log_line(),
            "[2024-03-09 14:05:07] Original: \"helo\" -> Correction: \"hello\"\n"
        );
        assert!(!entry.processed);
    }

    #[test]
    fn test_entries_without_context_still_load() {
        let document: FeedbackDocument = serde_json::from_str(
            r#"{"feedback": [{"timestamp": "2024-03-09 14:05:07", "original": "a", "correction": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(document.feedback[0].context, None);
        assert!(!document.feedback[0].processed);
    }

    #[test]
    fn test_stats_count_processed_and_keep_latest() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            FeedbackStats::from_entries(&[]),
            FeedbackStats {
                total_entries: 0,
                processed_entries: 0,
                unprocessed_entries: 0,
                latest_feedback: None,
            }
        );

        let mut first = FeedbackEntry::new("helo", "hello", at);
        first.processed = true;
        let latest = FeedbackEntry::new("by", "bye", at);
        let stats = FeedbackStats::from_entries(&[first, latest.clone()]);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.processed_entries, 1);
        assert_eq!(stats.unprocessed_entries, 1);
        assert_eq!(stats.latest_feedback, Some(latest));
    }
}
