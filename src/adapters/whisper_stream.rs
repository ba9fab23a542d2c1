use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use whisper_rs::WhisperContext;

use crate::adapters::whisper_cpp::{
    convert_samples, decode, effective_threads, load_context, WHISPER_SAMPLE_RATE,
};
use crate::domain::audio::{calculate_rms, resample};
use crate::domain::config::RecognitionConfig;
use crate::domain::{AudioBuffer, DomainError, SignLanguage};
use crate::ports::{RecognitionEngine, RecognitionModel, StreamingRecognizer};

/// Segmentation thresholds, in samples at 16 kHz.
#[derive(Debug, Clone, Copy)]
pub struct SegmenterSettings {
    pub partial_interval: usize,
    pub endpoint_silence: usize,
    pub max_utterance: usize,
    /// Normalized RMS below which a frame counts as silence.
    pub silence_threshold: f32,
}

impl SegmenterSettings {
    pub fn from_config(config: &RecognitionConfig) -> Self {
        let per_ms = WHISPER_SAMPLE_RATE as usize / 1000;
        Self {
            partial_interval: config.partial_interval_ms as usize * per_ms,
            endpoint_silence: config.endpoint_silence_ms as usize * per_ms,
            max_utterance: config.max_utterance_ms as usize * per_ms,
            silence_threshold: config.silence_threshold,
        }
    }
}

/// What the segmenter wants done after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Nothing to decode yet.
    Waiting,
    /// Re-decode the open utterance for a fresh partial.
    Partial,
    /// The utterance closed; decode it as final.
    Final,
}

/// Energy-based utterance segmentation over a rolling buffer.
#[derive(Debug)]
pub struct UtteranceSegmenter {
    settings: SegmenterSettings,
    buffer: AudioBuffer,
    heard_speech: bool,
    silence_run: usize,
    since_partial: usize,
}

impl UtteranceSegmenter {
    pub fn new(settings: SegmenterSettings) -> Self {
        Self {
            settings,
            buffer: AudioBuffer::with_capacity(WHISPER_SAMPLE_RATE, settings.max_utterance),
            heard_speech: false,
            silence_run: 0,
            since_partial: 0,
        }
    }

    pub fn push(&mut self, frame: &[i16]) -> Segment {
        self.buffer.push_samples(frame);

        if calculate_rms(frame) >= self.settings.silence_threshold {
            self.heard_speech = true;
            self.silence_run = 0;
        } else {
            self.silence_run += frame.len();
        }

        if !self.heard_speech {
            // Keep only a short lead-in of silence before speech starts.
            let excess = self.buffer.len().saturating_sub(self.settings.endpoint_silence);
            self.buffer.drain_front(excess);
            return Segment::Waiting;
        }

        if self.silence_run >= self.settings.endpoint_silence
            || self.buffer.len() >= self.settings.max_utterance
        {
            return Segment::Final;
        }

        self.since_partial += frame.len();
        if self.since_partial >= self.settings.partial_interval {
            self.since_partial = 0;
            return Segment::Partial;
        }
        Segment::Waiting
    }

    /// Audio of the open utterance.
    pub fn audio(&self) -> &[i16] {
        self.buffer.samples()
    }

    /// Start a new utterance.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.heard_speech = false;
        self.silence_run = 0;
        self.since_partial = 0;
    }
}

/// Drop whisper's non-speech annotations such as `[BLANK_AUDIO]` or `(music)`.
pub fn clean_transcript(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Loads whisper.cpp models and shares one context per model file across
/// languages.
pub struct WhisperEngine {
    threads: u32,
    settings: SegmenterSettings,
    contexts: Mutex<HashMap<PathBuf, Arc<WhisperContext>>>,
}

impl WhisperEngine {
    pub fn new(config: &RecognitionConfig) -> Self {
        Self {
            threads: effective_threads(config.threads),
            settings: SegmenterSettings::from_config(config),
            contexts: Mutex::new(HashMap::new()),
        }
    }
}

impl RecognitionEngine for WhisperEngine {
    fn name(&self) -> &'static str {
        "whisper.cpp"
    }

    fn load(
        &self,
        language: SignLanguage,
        path: &Path,
    ) -> Result<Arc<dyn RecognitionModel>, DomainError> {
        let mut contexts = self.contexts.lock();
        let context = match contexts.get(path) {
            Some(ctx) => Arc::clone(ctx),
            None => {
                info!(path = ?path, "Loading whisper model");
                let ctx = Arc::new(load_context(path)?);
                contexts.insert(path.to_path_buf(), Arc::clone(&ctx));
                ctx
            }
        };

        debug!(%language, code = language.whisper_code(), "Whisper model bound");
        Ok(Arc::new(WhisperModel {
            context,
            language,
            threads: self.threads,
            settings: self.settings,
        }))
    }
}

struct WhisperModel {
    context: Arc<WhisperContext>,
    language: SignLanguage,
    threads: u32,
    settings: SegmenterSettings,
}

impl RecognitionModel for WhisperModel {
    fn language(&self) -> SignLanguage {
        self.language
    }

    fn recognizer(&self, sample_rate: u32) -> Result<Box<dyn StreamingRecognizer>, DomainError> {
        if sample_rate == 0 {
            return Err(DomainError::Recognizer("Sample rate must be positive".to_string()));
        }
        Ok(Box::new(WhisperStreamingRecognizer {
            context: Arc::clone(&self.context),
            code: self.language.whisper_code(),
            threads: self.threads,
            input_rate: sample_rate,
            segmenter: UtteranceSegmenter::new(self.settings),
            partial: String::new(),
            final_text: String::new(),
        }))
    }
}

struct WhisperStreamingRecognizer {
    context: Arc<WhisperContext>,
    code: &'static str,
    threads: u32,
    input_rate: u32,
    segmenter: UtteranceSegmenter,
    partial: String,
    final_text: String,
}

impl WhisperStreamingRecognizer {
    fn decode_open_utterance(&self) -> Result<String, DomainError> {
        let samples = convert_samples(self.segmenter.audio());
        let (text, _) = decode(&self.context, &samples, Some(self.code), self.threads)?;
        Ok(clean_transcript(&text))
    }
}

impl StreamingRecognizer for WhisperStreamingRecognizer {
    fn accept_waveform(&mut self, samples: &[i16]) -> Result<bool, DomainError> {
        let frame = if self.input_rate == WHISPER_SAMPLE_RATE {
            self.segmenter.push(samples)
        } else {
            self.segmenter
                .push(&resample(samples, self.input_rate, WHISPER_SAMPLE_RATE))
        };

        match frame {
            Segment::Waiting => Ok(false),
            Segment::Partial => {
                self.partial = self.decode_open_utterance()?;
                Ok(false)
            }
            Segment::Final => {
                let decoded = self.decode_open_utterance();
                self.segmenter.clear();
                self.partial.clear();
                match decoded {
                    Ok(text) => {
                        self.final_text = text;
                        Ok(true)
                    }
                    Err(e) => {
                        warn!(error = %e, "Dropping utterance that failed to decode");
                        Err(e)
                    }
                }
            }
        }
    }

    fn partial_result(&mut self) -> Result<String, DomainError> {
        Ok(self.partial.clone())
    }

    fn result(&mut self) -> Result<String, DomainError> {
        Ok(std::mem::take(&mut self.final_text))
    }

    fn reset(&mut self) {
        self.segmenter.clear();
        self.partial.clear();
        self.final_text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SegmenterSettings {
        SegmenterSettings {
            partial_interval: 3000,
            endpoint_silence: 2048,
            max_utterance: 16000,
            silence_threshold: 0.01,
        }
    }

    fn speech() -> Vec<i16> {
        vec![8000; 1024]
    }

    fn silence() -> Vec<i16> {
        vec![0; 1024]
    }

    #[test]
    fn test_settings_from_config() {
        let config = RecognitionConfig::default();
        let s = SegmenterSettings::from_config(&config);
        assert_eq!(s.endpoint_silence, config.endpoint_silence_ms as usize * 16);
        assert_eq!(s.max_utterance, config.max_utterance_ms as usize * 16);
    }

    #[test]
    fn test_leading_silence_never_finalizes() {
        let mut seg = UtteranceSegmenter::new(settings());
        for _ in 0..50 {
            assert_eq!(seg.push(&silence()), Segment::Waiting);
        }
        assert!(seg.audio().len() <= 2048);
    }

    #[test]
    fn test_partial_then_endpoint() {
        let mut seg = UtteranceSegmenter::new(settings());
        assert_eq!(seg.push(&speech()), Segment::Waiting);
        assert_eq!(seg.push(&speech()), Segment::Waiting);
        assert_eq!(seg.push(&speech()), Segment::Partial);
        assert_eq!(seg.push(&silence()), Segment::Waiting);
        assert_eq!(seg.push(&silence()), Segment::Final);

        seg.clear();
        assert!(seg.audio().is_empty());
        assert_eq!(seg.push(&silence()), Segment::Waiting);
    }

    #[test]
    fn test_forced_final_at_max_utterance() {
        let mut seg = UtteranceSegmenter::new(settings());
        let mut finals = 0;
        for _ in 0..16 {
            if seg.push(&speech()) == Segment::Final {
                finals += 1;
            }
        }
        assert_eq!(finals, 1);
    }

    #[test]
    fn test_clean_transcript() {
        assert_eq!(clean_transcript(" [BLANK_AUDIO] "), "");
        assert_eq!(clean_transcript("hello (music) world"), "hello world");
        assert_eq!(clean_transcript("  how are you "), "how are you");
    }

    #[test]
    fn test_missing_model_file() {
        let engine = WhisperEngine::new(&RecognitionConfig::default());
        let err = engine
            .load(SignLanguage::Asl, Path::new("/nonexistent/ggml-base.bin"))
            .err()
            .unwrap();
        assert!(matches!(err, DomainError::ModelNotFound(_)));
    }
}
