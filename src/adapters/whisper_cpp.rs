use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::adapters::whisper_stream::clean_transcript;
use crate::domain::{AudioBuffer, DomainError, SignLanguage};
use crate::ports::{Transcriber, Transcription};

/// Sample rate whisper.cpp models are trained on.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Resolve a configured thread count. 0 means auto-detect (cores - 1).
pub(crate) fn effective_threads(threads: u32) -> u32 {
    if threads == 0 {
        std::thread::available_parallelism()
            .map(|p| std::cmp::max(1, p.get() as u32 - 1))
            .unwrap_or(1)
    } else {
        threads
    }
}

/// Convert i16 samples to f32 (whisper expects f32 samples in range [-1, 1]).
pub(crate) fn convert_samples(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / 32768.0).collect()
}

/// Load a ggml model file.
pub(crate) fn load_context(path: &Path) -> Result<WhisperContext, DomainError> {
    if !path.exists() {
        return Err(DomainError::ModelNotFound(path.to_string_lossy().to_string()));
    }
    let path_str = path.to_string_lossy();
    WhisperContext::new_with_params(&path_str, WhisperContextParameters::default())
        .map_err(|e| DomainError::Whisper(format!("Failed to load model: {}", e)))
}

/// Run one full decode over `samples` and return the joined segment text
/// together with the language whisper settled on.
pub(crate) fn decode(
    ctx: &WhisperContext,
    samples: &[f32],
    language: Option<&str>,
    threads: u32,
) -> Result<(String, Option<String>), DomainError> {
    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_n_threads(threads as i32);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);
    params.set_print_special(false);
    params.set_language(language);

    let mut state = ctx
        .create_state()
        .map_err(|e| DomainError::Whisper(format!("Failed to create whisper state: {}", e)))?;

    state
        .full(params, samples)
        .map_err(|e| DomainError::Whisper(format!("Transcription failed: {}", e)))?;

    let num_segments = state
        .full_n_segments()
        .map_err(|e| DomainError::Whisper(format!("Failed to get segment count: {}", e)))?;

    let mut text = String::new();
    for i in 0..num_segments {
        if let Ok(segment_text) = state.full_get_segment_text(i) {
            text.push_str(&segment_text);
        }
    }

    let detected_language = state
        .full_lang_id_from_state()
        .ok()
        .and_then(|id| whisper_rs::get_lang_str(id).map(|s| s.to_string()));

    Ok((text.trim().to_string(), detected_language))
}

/// Transcriber for uploaded recordings using whisper.cpp via whisper-rs.
pub struct WhisperCppTranscriber {
    context: RwLock<Option<Arc<WhisperContext>>>,
    threads: u32,
}

impl WhisperCppTranscriber {
    /// The `threads` parameter specifies the number of threads to use.
    /// 0 means auto-detect (cores - 1).
    pub fn new(threads: u32) -> Self {
        let actual_threads = effective_threads(threads);
        info!(threads = actual_threads, "WhisperCppTranscriber created");

        Self {
            context: RwLock::new(None),
            threads: actual_threads,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCppTranscriber {
    async fn transcribe(
        &self,
        audio: &AudioBuffer,
        language: SignLanguage,
    ) -> Result<Transcription, DomainError> {
        let context = self.context.read().clone();
        let ctx = context.ok_or_else(|| DomainError::Whisper("No model loaded".to_string()))?;

        if audio.sample_rate() != WHISPER_SAMPLE_RATE {
            return Err(DomainError::Whisper(format!(
                "Expected 16kHz audio, got {}Hz",
                audio.sample_rate()
            )));
        }

        if audio.is_empty() {
            return Ok(Transcription::default());
        }

        let samples = convert_samples(audio.samples());
        let threads = self.threads;
        let code = language.whisper_code();

        debug!(
            samples = samples.len(),
            duration_secs = audio.duration_secs(),
            threads,
            code,
            "Starting transcription"
        );

        let start = std::time::Instant::now();

        // CPU-bound
        let (text, detected_language) =
            tokio::task::spawn_blocking(move || decode(&ctx, &samples, Some(code), threads))
                .await
                .map_err(|e| DomainError::Whisper(format!("Task join error: {}", e)))??;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let text = clean_transcript(&text);

        info!(
            %language,
            text_len = text.len(),
            elapsed_ms,
            detected_language = ?detected_language,
            "Transcription complete"
        );

        Ok(Transcription {
            text,
            detected_language,
            elapsed_ms,
        })
    }

    fn method(&self) -> &'static str {
        "whisper.cpp"
    }

    async fn load_model(&self, path: &Path) -> Result<(), DomainError> {
        info!(path = ?path, "Loading whisper model");

        let owned = path.to_path_buf();
        let ctx = tokio::task::spawn_blocking(move || load_context(&owned))
            .await
            .map_err(|e| DomainError::Whisper(format!("Task join error: {}", e)))??;

        *self.context.write() = Some(Arc::new(ctx));

        info!(path = ?path, "Whisper model loaded successfully");
        Ok(())
    }

    fn is_model_loaded(&self) -> bool {
        self.context.read().is_some()
    }
}
