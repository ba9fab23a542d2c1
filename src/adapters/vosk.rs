use std::path::Path;
use std::sync::Arc;

use tracing::info;
use vosk::{DecodingState, Model, Recognizer};

use crate::domain::{DomainError, SignLanguage};
use crate::ports::{RecognitionEngine, RecognitionModel, StreamingRecognizer};

/// Kaldi/Vosk streaming recognition.
#[derive(Debug, Default)]
pub struct VoskEngine;

impl RecognitionEngine for VoskEngine {
    fn name(&self) -> &'static str {
        "vosk"
    }

    fn load(
        &self,
        language: SignLanguage,
        path: &Path,
    ) -> Result<Arc<dyn RecognitionModel>, DomainError> {
        let model = Model::new(path.to_string_lossy()).ok_or_else(|| {
            DomainError::ModelUnavailable {
                language: language.to_string(),
                reason: format!("Vosk could not load {}", path.display()),
            }
        })?;
        info!(%language, path = ?path, "Vosk model loaded");
        Ok(Arc::new(VoskModel { model, language }))
    }
}

struct VoskModel {
    model: Model,
    language: SignLanguage,
}

impl RecognitionModel for VoskModel {
    fn language(&self) -> SignLanguage {
        self.language
    }

    fn recognizer(&self, sample_rate: u32) -> Result<Box<dyn StreamingRecognizer>, DomainError> {
        let recognizer = Recognizer::new(&self.model, sample_rate as f32).ok_or_else(|| {
            DomainError::Recognizer("Failed to create Vosk recognizer".to_string())
        })?;
        Ok(Box::new(VoskRecognizer { recognizer }))
    }
}

struct VoskRecognizer {
    recognizer: Recognizer,
}

impl StreamingRecognizer for VoskRecognizer {
    fn accept_waveform(&mut self, samples: &[i16]) -> Result<bool, DomainError> {
        let state = self
            .recognizer
            .accept_waveform(samples)
            .map_err(|e| DomainError::Recognizer(format!("{:?}", e)))?;
        match state {
            DecodingState::Finalized => Ok(true),
            DecodingState::Running => Ok(false),
            DecodingState::Failed => Err(DomainError::Recognizer("Decoding failed".to_string())),
        }
    }

    fn partial_result(&mut self) -> Result<String, DomainError> {
        Ok(self.recognizer.partial_result().partial.to_string())
    }

    fn result(&mut self) -> Result<String, DomainError> {
        Ok(self
            .recognizer
            .result()
            .single()
            .map(|r| r.text.to_string())
            .unwrap_or_default())
    }

    fn reset(&mut self) {
        self.recognizer.reset();
    }
}
