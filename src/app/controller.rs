use std::fs;
use std::sync::Arc;

use axum::Router;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{
    build_analyzer, CpalAudioSource, FsUploadStore, JsonFeedbackStore, LocalModelRegistry,
    MediaRoots, PassThroughConverter, TomlConfigStore, WhisperCppTranscriber, WhisperEngine,
};
use crate::api::{build_router, ApiState};
use crate::app::session::{SessionManager, SessionSettings};
use crate::app::speech::SpeechService;
use crate::app::translator::Translator;
use crate::domain::config::RecognitionConfig;
use crate::domain::{AppConfig, DomainError, Lexicon, RecognitionBackend, SignResolver};
use crate::infrastructure::init_logging;
use crate::ports::{ConfigStore, ModelRegistry, RecognitionEngine, Transcriber};

/// Recognition settings with the backend this build can run.
///
/// Vosk needs the `vosk` feature; without it the registry and the engine both
/// switch to whisper.cpp so model lookups match the loader.
pub(crate) fn effective_recognition(config: &RecognitionConfig) -> RecognitionConfig {
    let mut recognition = config.clone();
    if !cfg!(feature = "vosk") && recognition.backend == RecognitionBackend::Vosk {
        warn!("Built without the vosk feature, using whisper.cpp for streaming");
        recognition.backend = RecognitionBackend::Whisper;
    }
    recognition
}

fn recognition_engine(recognition: &RecognitionConfig) -> Arc<dyn RecognitionEngine> {
    match recognition.backend {
        #[cfg(feature = "vosk")]
        RecognitionBackend::Vosk => Arc::new(crate::adapters::VoskEngine),
        _ => Arc::new(WhisperEngine::new(recognition)),
    }
}

/// Application controller that orchestrates initialization and owns the
/// services behind the HTTP API.
pub struct AppController {
    config: AppConfig,
    config_store: Arc<TomlConfigStore>,
    state: ApiState,
    media: MediaRoots,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Initialize the application controller.
    /// This sets up configuration, logging, media, recognition and storage.
    pub async fn new() -> Result<Self, DomainError> {
        // Step 1: Initialize config store
        let config_store = Arc::new(TomlConfigStore::new()?);

        // Step 2: Load configuration
        let config = config_store.load()?;

        // Step 3: Initialize logging
        let log_guard = init_logging(&config_store.logs_dir(), &config.logging)?;

        info!(
            version = env!("CARGO_PKG_VERSION"),
            data_dir = ?config_store.data_dir(),
            "SignBridge starting up"
        );

        // Step 4: Sign lexicon and media index
        let lexicon = match &config.media.lexicon_path {
            Some(path) => {
                let path = config_store.resolve(path);
                info!(path = ?path, "Loading sign lexicon");
                Lexicon::from_toml_str(&fs::read_to_string(&path)?)?
            }
            None => Lexicon::builtin()?,
        };

        let media = MediaRoots {
            videos: config_store.resolve(&config.media.videos_dir),
            asl_letters: config_store.resolve(&config.media.asl_letters_dir),
            isl_letters: config_store.resolve(&config.media.isl_letters_dir),
        };
        let catalog = media.scan()?;
        let resolver = SignResolver::new(
            Arc::new(lexicon),
            Arc::new(catalog),
            config.media.not_understood_video.clone(),
        );

        // Step 5: Translation pipeline
        let tagger_lexicon = config
            .analyzer
            .tagger_lexicon
            .as_deref()
            .map(|p| config_store.resolve(p));
        let analyzer = build_analyzer(config.analyzer.mode, tagger_lexicon.as_deref());
        let translator = Arc::new(Translator::new(
            analyzer,
            Arc::new(PassThroughConverter),
            Arc::new(resolver),
        ));
        info!(analyzer = translator.analyzer_name(), "Translator ready");

        // Step 6: Live recognition sessions
        let recognition = effective_recognition(&config.recognition);
        let recognition = &recognition;
        let models_dir = config_store.resolve(&recognition.models_dir);
        let models: Arc<dyn ModelRegistry> =
            Arc::new(LocalModelRegistry::new(models_dir.clone(), recognition));
        let sessions = Arc::new(SessionManager::new(
            recognition_engine(recognition),
            Arc::clone(&models),
            Arc::new(CpalAudioSource::new()),
            SessionSettings::from_config(recognition),
        ));

        // Step 7: Offline transcription of uploads
        let transcriber = WhisperCppTranscriber::new(recognition.threads);
        let whisper_path = models_dir.join(&recognition.whisper_model);
        if let Err(e) = transcriber.load_model(&whisper_path).await {
            warn!(path = ?whisper_path, error = %e, "Upload transcription unavailable");
        }
        let speech = Arc::new(SpeechService::new(
            Arc::new(transcriber),
            Arc::clone(&translator),
        ));

        // Step 8: User contributions
        let feedback = Arc::new(JsonFeedbackStore::new(
            config_store.resolve(&config.storage.feedback_dir),
        ));
        let uploads = FsUploadStore::new(config_store.resolve(&config.storage.uploads_dir));
        uploads.init().await?;

        let state = ApiState {
            translator,
            sessions,
            speech,
            feedback,
            uploads: Arc::new(uploads),
            models,
        };

        info!(
            speech_ready = state.speech.is_ready(),
            backend = ?recognition.backend,
            "AppController initialized"
        );

        Ok(Self {
            config,
            config_store,
            state,
            media,
            _log_guard: log_guard,
        })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the HTTP router over the controller's services.
    pub fn router(&self) -> Router {
        build_router(
            self.state.clone(),
            &self.media,
            &self.config.server.cors_origins,
        )
    }

    /// Stop any live recognition stream.
    pub async fn shutdown(&self) {
        self.state.sessions.stop_stream().await;
        info!(config = ?self.config_store.config_path(), "SignBridge stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SignLanguage;

    #[test]
    fn test_whisper_backend_is_kept() {
        let recognition = effective_recognition(&RecognitionConfig::default());
        assert_eq!(recognition.backend, RecognitionBackend::Whisper);
        assert_eq!(recognition_engine(&recognition).name(), "whisper.cpp");
    }

    #[test]
    fn test_registry_and_engine_agree_on_backend() {
        let configured = RecognitionConfig {
            backend: RecognitionBackend::Vosk,
            ..RecognitionConfig::default()
        };
        let recognition = effective_recognition(&configured);
        let engine = recognition_engine(&recognition);
        let registry = LocalModelRegistry::new("models".into(), &recognition);
        let status = registry.status(SignLanguage::Hindi);

        assert_eq!(status.backend, recognition.backend);
        if cfg!(feature = "vosk") {
            assert_eq!(engine.name(), "vosk");
            assert!(status.path.ends_with(SignLanguage::Hindi.vosk_model_dir()));
        } else {
            assert_eq!(engine.name(), "whisper.cpp");
            assert!(status.path.ends_with(&recognition.whisper_model));
        }
    }
}
