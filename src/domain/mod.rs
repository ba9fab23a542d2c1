pub mod audio;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod feedback;
pub mod grammar;
pub mod language;
pub mod lexicon;
pub mod media;
pub mod model;
pub mod resolver;
pub mod sentiment;
pub mod transcription;
pub mod upload;

pub use audio::{AtomicAudioState, AudioConfig, AudioState};
pub use config::{AnalyzerMode, AppConfig, RecognitionBackend};
pub use dispatcher::IncrementalDispatcher;
pub use error::DomainError;
pub use feedback::{FeedbackDocument, FeedbackEntry, FeedbackStats};
pub use grammar::{GrammarContext, GrammarType, SignGrammar, TranslationResult};
pub use language::{Script, SignLanguage};
pub use lexicon::Lexicon;
pub use media::{MediaCatalog, MediaCategory};
pub use model::ModelStatus;
pub use resolver::SignResolver;
pub use sentiment::Sentiment;
pub use transcription::{AudioBuffer, RecognitionSnapshot, StreamEvent};
pub use upload::{UploadDirsReport, UploadRecord};
