use serde::Serialize;
use std::path::PathBuf;

use crate::domain::config::RecognitionBackend;
use crate::domain::language::SignLanguage;

/// Items every Kaldi/Vosk model directory must contain.
pub const VOSK_REQUIRED_ITEMS: [&str; 4] = ["am", "conf", "graph", "ivector"];

/// Installation state of the recognition model for one language.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub language: SignLanguage,
    pub backend: RecognitionBackend,
    /// Where the model is expected on disk.
    pub path: PathBuf,
    /// The model exists and has every required item.
    pub available: bool,
    /// Required items that were not found. Empty when available.
    pub missing: Vec<String>,
}

impl ModelStatus {
    pub fn new(language: SignLanguage, backend: RecognitionBackend, path: PathBuf) -> Self {
        Self {
            language,
            backend,
            path,
            available: false,
            missing: Vec::new(),
        }
    }

    /// Mark the model usable when nothing is missing.
    pub fn with_missing(mut self, missing: Vec<String>) -> Self {
        self.available = missing.is_empty();
        self.missing = missing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_availability_follows_missing_items() {
        let status = ModelStatus::new(
            SignLanguage::Hindi,
            RecognitionBackend::Vosk,
            PathBuf::from("models/vosk-model-small-hi-0.22"),
        );
        assert!(!status.available);

        let complete = status.clone().with_missing(Vec::new());
        assert!(complete.available);

        let partial = status.with_missing(vec!["ivector".to_string()]);
        assert!(!partial.available);
        assert_eq!(partial.missing, vec!["ivector"]);
    }
}
