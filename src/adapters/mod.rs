pub mod audio_cpal;
pub mod composite_analyzer;
pub mod config_store;
pub mod feedback_store;
pub mod grammar;
pub mod keyword_analyzer;
pub mod media_catalog;
pub mod model_manager;
pub mod tagged_analyzer;
pub mod upload_store;
#[cfg(feature = "vosk")]
pub mod vosk;
pub mod wav;
pub mod whisper_cpp;
pub mod whisper_stream;

pub use audio_cpal::CpalAudioSource;
pub use composite_analyzer::{build_analyzer, CompositeAnalyzer};
pub use config_store::TomlConfigStore;
pub use feedback_store::JsonFeedbackStore;
pub use grammar::PassThroughConverter;
pub use keyword_analyzer::KeywordAnalyzer;
pub use media_catalog::MediaRoots;
pub use model_manager::LocalModelRegistry;
pub use tagged_analyzer::TaggedAnalyzer;
pub use upload_store::FsUploadStore;
#[cfg(feature = "vosk")]
pub use vosk::VoskEngine;
pub use wav::decode_wav;
pub use whisper_cpp::WhisperCppTranscriber;
pub use whisper_stream::WhisperEngine;
