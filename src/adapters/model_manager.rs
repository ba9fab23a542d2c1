use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::config::RecognitionConfig;
use crate::domain::model::VOSK_REQUIRED_ITEMS;
use crate::domain::{ModelStatus, RecognitionBackend, SignLanguage};
use crate::ports::ModelRegistry;

/// Model registry over a local models directory.
///
/// Whisper uses one multilingual `ggml-*.bin` for every language; Vosk keeps
/// one model directory per language.
pub struct LocalModelRegistry {
    models_dir: PathBuf,
    backend: RecognitionBackend,
    whisper_model: String,
}

impl LocalModelRegistry {
    pub fn new(models_dir: PathBuf, config: &RecognitionConfig) -> Self {
        let registry = Self {
            models_dir,
            backend: config.backend,
            whisper_model: config.whisper_model.clone(),
        };

        let available = registry.statuses().iter().filter(|s| s.available).count();
        info!(
            models_dir = ?registry.models_dir,
            backend = ?registry.backend,
            available,
            "LocalModelRegistry initialized"
        );
        registry
    }
}

impl ModelRegistry for LocalModelRegistry {
    fn model_path(&self, language: SignLanguage) -> PathBuf {
        match self.backend {
            RecognitionBackend::Whisper => self.models_dir.join(&self.whisper_model),
            RecognitionBackend::Vosk => self.models_dir.join(language.vosk_model_dir()),
        }
    }

    fn status(&self, language: SignLanguage) -> ModelStatus {
        let path = self.model_path(language);
        let missing = match self.backend {
            RecognitionBackend::Whisper => {
                if path.is_file() {
                    Vec::new()
                } else {
                    vec![self.whisper_model.clone()]
                }
            }
            RecognitionBackend::Vosk => VOSK_REQUIRED_ITEMS
                .iter()
                .filter(|item| !path.join(item).exists())
                .map(|item| item.to_string())
                .collect(),
        };

        if !missing.is_empty() {
            debug!(%language, path = ?path, ?missing, "Model incomplete");
        }
        ModelStatus::new(language, self.backend, path).with_missing(missing)
    }

    fn models_dir(&self) -> PathBuf {
        self.models_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config(backend: RecognitionBackend) -> RecognitionConfig {
        RecognitionConfig {
            backend,
            ..RecognitionConfig::default()
        }
    }

    #[test]
    fn test_whisper_model_shared_across_languages() {
        let temp = tempfile::tempdir().unwrap();
        let registry = LocalModelRegistry::new(
            temp.path().to_path_buf(),
            &config(RecognitionBackend::Whisper),
        );

        assert_eq!(
            registry.model_path(SignLanguage::Asl),
            registry.model_path(SignLanguage::Telugu)
        );
        assert!(!registry.status(SignLanguage::Asl).available);

        fs::write(temp.path().join("ggml-base.bin"), b"model").unwrap();
        assert!(registry.statuses().iter().all(|s| s.available));
    }

    #[test]
    fn test_vosk_requires_every_item() {
        let temp = tempfile::tempdir().unwrap();
        let registry =
            LocalModelRegistry::new(temp.path().to_path_buf(), &config(RecognitionBackend::Vosk));

        let hindi = registry.model_path(SignLanguage::Hindi);
        assert!(hindi.ends_with("vosk-model-small-hi-0.22"));
        assert_eq!(registry.status(SignLanguage::Hindi).missing.len(), 4);

        for item in ["am", "conf", "graph"] {
            fs::create_dir_all(hindi.join(item)).unwrap();
        }
        let status = registry.status(SignLanguage::Hindi);
        assert!(!status.available);
        assert_eq!(status.missing, vec!["ivector"]);

        fs::create_dir_all(hindi.join("ivector")).unwrap();
        assert!(registry.status(SignLanguage::Hindi).available);
        assert!(!registry.status(SignLanguage::Gujarati).available);
    }
}
