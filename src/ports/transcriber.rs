use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{AudioBuffer, DomainError, SignLanguage};

/// Text recognized in one recording.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcription {
    pub text: String,
    /// Language code the backend settled on, when it reports one.
    pub detected_language: Option<String>,
    /// Wall-clock decoding time.
    pub elapsed_ms: u64,
}

/// Port for whole-recording transcription.
///
/// Used for uploaded audio; live microphone audio goes through the
/// streaming recognizer instead.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe 16 kHz mono audio spoken in `language`'s speech locale.
    async fn transcribe(
        &self,
        audio: &AudioBuffer,
        language: SignLanguage,
    ) -> Result<Transcription, DomainError>;

    /// Backend name reported to clients as the recognition method.
    fn method(&self) -> &'static str;

    async fn load_model(&self, path: &Path) -> Result<(), DomainError>;

    fn is_model_loaded(&self) -> bool;
}
