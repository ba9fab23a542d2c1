use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            cors_origins: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
            max_files: 7,
        }
    }
}

/// Media asset locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory holding word/phrase sign videos (`*.mp4`).
    pub videos_dir: PathBuf,
    /// Directory holding ASL letter images (`{LETTER}_test.jpg`).
    pub asl_letters_dir: PathBuf,
    /// Directory holding ISL letter images (`{LETTER}.jpg`).
    pub isl_letters_dir: PathBuf,
    /// Clip shown when nothing in the input could be resolved.
    pub not_understood_video: String,
    /// Optional TOML file replacing the built-in sign lexicon.
    pub lexicon_path: Option<PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            videos_dir: PathBuf::from("assets/mp4videos"),
            asl_letters_dir: PathBuf::from("assets/alphabetimages"),
            isl_letters_dir: PathBuf::from("assets/indianalphabetsandnumbers"),
            not_understood_video: "not_understand.mp4".to_string(),
            lexicon_path: None,
        }
    }
}

/// Which streaming recognizer implementation to load models with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionBackend {
    /// whisper.cpp with rolling re-decode for partial results.
    Whisper,
    /// Kaldi/Vosk native streaming (requires the `vosk` feature).
    Vosk,
}

/// Streaming recognition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub backend: RecognitionBackend,
    /// Root directory holding recognition models.
    pub models_dir: PathBuf,
    /// Multilingual whisper model file inside `models_dir`.
    pub whisper_model: String,
    /// Number of decoding threads (0 = auto).
    pub threads: u32,
    /// Minimum gap between two partial-result word events.
    pub debounce_ms: u64,
    /// Samples per frame read from the microphone.
    pub frame_size: usize,
    /// Capture sample rate in Hz.
    pub sample_rate: u32,
    /// Upper bound on waiting for a previous stream to release the device.
    pub switch_grace_ms: u64,
    /// Whisper streaming: re-decode the utterance after this much new audio.
    pub partial_interval_ms: u64,
    /// Whisper streaming: trailing silence that closes an utterance.
    pub endpoint_silence_ms: u64,
    /// Whisper streaming: force a final result after this much audio.
    pub max_utterance_ms: u64,
    /// Whisper streaming: RMS level below which a frame counts as silence.
    pub silence_threshold: f32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            backend: RecognitionBackend::Whisper,
            models_dir: PathBuf::from("models"),
            whisper_model: "ggml-base.bin".to_string(),
            threads: 0,
            debounce_ms: 300,
            frame_size: 1024,
            sample_rate: 16_000,
            switch_grace_ms: 500,
            partial_interval_ms: 600,
            endpoint_silence_ms: 800,
            max_utterance_ms: 15_000,
            silence_threshold: 0.01,
        }
    }
}

/// How the context analyzer is chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerMode {
    /// Use the tagger when its lexicon loads, keywords otherwise.
    Auto,
    /// Always use keyword heuristics.
    Keyword,
}

/// Context analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub mode: AnalyzerMode,
    /// Optional TOML file replacing the built-in tagger lexicon.
    pub tagger_lexicon: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            mode: AnalyzerMode::Auto,
            tagger_lexicon: None,
        }
    }
}

/// Where user-generated data is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Feedback JSON document and plaintext log.
    pub feedback_dir: PathBuf,
    /// Per-language uploaded sign media.
    pub uploads_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            feedback_dir: PathBuf::from("feedback"),
            uploads_dir: PathBuf::from("uploads"),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub media: MediaConfig,
    pub recognition: RecognitionConfig,
    pub analyzer: AnalyzerConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
