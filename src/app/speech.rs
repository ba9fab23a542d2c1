use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::adapters::decode_wav;
use crate::adapters::whisper_cpp::WHISPER_SAMPLE_RATE;
use crate::app::translator::Translator;
use crate::domain::sentiment::{self, Sentiment};
use crate::domain::{DomainError, SignLanguage};
use crate::ports::Transcriber;

/// Transcript of an uploaded recording.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechTranscript {
    pub text: String,
    /// Speech locale the recording was decoded as.
    pub locale: &'static str,
    pub method: &'static str,
}

/// Transcript, sentiment and signs for an uploaded recording.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedAudio {
    pub text: String,
    pub sentiment: Sentiment,
    pub sign_paths: Vec<String>,
}

/// Offline recognition of uploaded WAV files.
pub struct SpeechService {
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<Translator>,
}

impl SpeechService {
    pub fn new(transcriber: Arc<dyn Transcriber>, translator: Arc<Translator>) -> Self {
        Self {
            transcriber,
            translator,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.transcriber.is_model_loaded()
    }

    /// Decode and transcribe a WAV upload in `language`.
    pub async fn transcribe(
        &self,
        wav: &[u8],
        language: SignLanguage,
    ) -> Result<SpeechTranscript, DomainError> {
        let audio = decode_wav(wav, WHISPER_SAMPLE_RATE)?;
        let result = self.transcriber.transcribe(&audio, language).await?;

        info!(
            %language,
            elapsed_ms = result.elapsed_ms,
            chars = result.text.len(),
            "Upload transcribed"
        );
        Ok(SpeechTranscript {
            text: result.text,
            locale: language.locale(),
            method: self.transcriber.method(),
        })
    }

    /// Transcribe, score sentiment and resolve signs for a WAV upload.
    pub async fn process(
        &self,
        wav: &[u8],
        language: SignLanguage,
    ) -> Result<ProcessedAudio, DomainError> {
        let transcript = self.transcribe(wav, language).await?;
        let sentiment = sentiment::analyze(&transcript.text);
        let sign_paths = self.translator.signs_for(&transcript.text, language);
        Ok(ProcessedAudio {
            text: transcript.text,
            sentiment,
            sign_paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;

    use async_trait::async_trait;

    use crate::adapters::{KeywordAnalyzer, PassThroughConverter};
    use crate::domain::{AudioBuffer, Lexicon, MediaCatalog, MediaCategory, SignResolver};
    use crate::ports::Transcription;

    struct CannedTranscriber(&'static str);

    #[async_trait]
    impl Transcriber for CannedTranscriber {
        async fn transcribe(
            &self,
            audio: &AudioBuffer,
            language: SignLanguage,
        ) -> Result<Transcription, DomainError> {
            assert_eq!(audio.sample_rate(), WHISPER_SAMPLE_RATE);
            assert_eq!(language.whisper_code(), "en");
            Ok(Transcription {
                text: self.0.to_string(),
                detected_language: Some("en".to_string()),
                elapsed_ms: 5,
            })
        }

        fn method(&self) -> &'static str {
            "canned"
        }

        async fn load_model(&self, _path: &Path) -> Result<(), DomainError> {
            Ok(())
        }

        fn is_model_loaded(&self) -> bool {
            true
        }
    }

    fn service(text: &'static str) -> SpeechService {
        let resolver = SignResolver::new(
            Arc::new(Lexicon::builtin().unwrap()),
            Arc::new(MediaCatalog::from_files([(MediaCategory::Videos, "hello.mp4")])),
            "not_understand.mp4",
        );
        let translator = Translator::new(
            Arc::new(KeywordAnalyzer),
            Arc::new(PassThroughConverter),
            Arc::new(resolver),
        );
        SpeechService::new(Arc::new(CannedTranscriber(text)), Arc::new(translator))
    }

    fn silent_wav() -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..1600 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    #[tokio::test]
    async fn test_transcribe_reports_locale_and_method() {
        let transcript = service("hello")
            .transcribe(&silent_wav(), SignLanguage::Asl)
            .await
            .unwrap();
        assert_eq!(transcript.text, "hello");
        assert_eq!(transcript.locale, "en-US");
        assert_eq!(transcript.method, "canned");
    }

    #[tokio::test]
    async fn test_process_scores_and_resolves() {
        let processed = service("hello what a great day")
            .process(&silent_wav(), SignLanguage::Isl)
            .await
            .unwrap();
        assert_eq!(processed.sentiment, Sentiment::Positive);
        assert!(!processed.sign_paths.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_upload() {
        let err = service("hello")
            .transcribe(b"RIFF????", SignLanguage::Asl)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Audio(_)));
    }
}
