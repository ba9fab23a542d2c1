pub mod analyzer;
pub mod audio;
pub mod config;
pub mod model_registry;
pub mod recognizer;
pub mod storage;
pub mod transcriber;

pub use analyzer::{ContextAnalyzer, GrammarConverter};
pub use audio::{AudioSource, AudioStream};
pub use config::ConfigStore;
pub use model_registry::ModelRegistry;
pub use recognizer::{RecognitionEngine, RecognitionModel, StreamingRecognizer};
pub use storage::{FeedbackStore, UploadStore};
pub use transcriber::{Transcriber, Transcription};
