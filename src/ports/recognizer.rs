use std::path::Path;
use std::sync::Arc;

use crate::domain::{DomainError, SignLanguage};

/// A recognizer bound to one model and one audio stream.
///
/// Mirrors the Kaldi-style incremental API: feed frames, read the running
/// hypothesis, and collect the final text once an utterance closes.
pub trait StreamingRecognizer: Send {
    /// Feed one frame of 16-bit mono audio.
    ///
    /// Returns `true` when this frame closed an utterance; its text is then
    /// available from [`result`](Self::result).
    fn accept_waveform(&mut self, samples: &[i16]) -> Result<bool, DomainError>;

    /// Running hypothesis for the open utterance.
    fn partial_result(&mut self) -> Result<String, DomainError>;

    /// Text of the most recently closed utterance.
    fn result(&mut self) -> Result<String, DomainError>;

    /// Discard any buffered audio and hypothesis.
    fn reset(&mut self);
}

/// A loaded recognition model.
pub trait RecognitionModel: Send + Sync {
    fn language(&self) -> SignLanguage;

    /// Create a fresh recognizer for audio at `sample_rate`.
    fn recognizer(&self, sample_rate: u32) -> Result<Box<dyn StreamingRecognizer>, DomainError>;
}

/// Port for loading streaming recognition models.
pub trait RecognitionEngine: Send + Sync {
    /// Backend name for logs and status output.
    fn name(&self) -> &'static str;

    /// Load the model stored at `path` for `language`.
    fn load(
        &self,
        language: SignLanguage,
        path: &Path,
    ) -> Result<Arc<dyn RecognitionModel>, DomainError>;
}
