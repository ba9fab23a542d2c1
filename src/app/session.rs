use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::config::RecognitionConfig;
use crate::domain::{
    AtomicAudioState, AudioConfig, AudioState, DomainError, IncrementalDispatcher,
    RecognitionSnapshot, SignLanguage, StreamEvent,
};
use crate::ports::{
    AudioSource, AudioStream, ModelRegistry, RecognitionEngine, RecognitionModel,
    StreamingRecognizer,
};

/// Events buffered between the capture worker and the SSE response.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Timing and framing for recognition streams.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub audio: AudioConfig,
    pub debounce: Duration,
    /// How long a stop waits for the worker to release the device.
    pub grace: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self {
            audio: AudioConfig {
                sample_rate: config.sample_rate,
                frame_size: config.frame_size,
                ..AudioConfig::default()
            },
            debounce: Duration::from_millis(config.debounce_ms),
            grace: Duration::from_millis(config.switch_grace_ms),
        }
    }
}

/// Snapshot of the session for status output.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub language: Option<String>,
    pub model_loaded: bool,
    pub audio_state: AudioState,
}

struct ActiveStream {
    recording: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

#[derive(Default)]
struct SessionState {
    language: Option<String>,
    model: Option<Arc<dyn RecognitionModel>>,
    active: Option<ActiveStream>,
}

/// Owns the selected language, its recognition model and at most one live
/// capture stream.
pub struct SessionManager {
    state: Mutex<SessionState>,
    audio_state: Arc<AtomicAudioState>,
    engine: Arc<dyn RecognitionEngine>,
    registry: Arc<dyn ModelRegistry>,
    audio: Arc<dyn AudioSource>,
    settings: SessionSettings,
}

impl SessionManager {
    pub fn new(
        engine: Arc<dyn RecognitionEngine>,
        registry: Arc<dyn ModelRegistry>,
        audio: Arc<dyn AudioSource>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            audio_state: Arc::new(AtomicAudioState::default()),
            engine,
            registry,
            audio,
            settings,
        }
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.state.lock();
        SessionStatus {
            language: state.language.clone(),
            model_loaded: state.model.is_some(),
            audio_state: self.audio_state.load(),
        }
    }

    /// Switch the session language, stopping any live stream first.
    ///
    /// The stream is stopped even when the request is rejected. Missing or
    /// unloadable models leave the session without a model rather than
    /// failing; streams then report that no language is ready.
    pub async fn select_language(&self, language: &str) -> Result<String, DomainError> {
        self.stop_stream().await;

        let language = language.trim();
        if language.is_empty() {
            return Err(DomainError::Validation("No language specified".to_string()));
        }

        let model = match SignLanguage::from_str(&language.to_lowercase()) {
            Ok(lang) => self.load_model(lang).await,
            Err(e) => {
                warn!(language, error = %e, "Using fallback recognition");
                None
            }
        };

        {
            let mut state = self.state.lock();
            state.language = Some(language.to_lowercase());
            state.model = model;
        }

        info!(language, "Language selected");
        Ok(format!(
            "{} selected (using best available recognition method)",
            language.to_uppercase()
        ))
    }

    async fn load_model(&self, language: SignLanguage) -> Option<Arc<dyn RecognitionModel>> {
        let status = self.registry.status(language);
        if !status.available {
            warn!(%language, path = ?status.path, missing = ?status.missing, "Model not installed");
            return None;
        }

        let engine = Arc::clone(&self.engine);
        let path = status.path;
        match tokio::task::spawn_blocking(move || engine.load(language, &path)).await {
            Ok(Ok(model)) => {
                info!(%language, engine = self.engine.name(), "Recognition model ready");
                Some(model)
            }
            Ok(Err(e)) => {
                warn!(%language, error = %e, "Failed to load model, using fallback");
                None
            }
            Err(e) => {
                error!(%language, error = %e, "Model loading task failed");
                None
            }
        }
    }

    /// Start a new recognition stream, replacing any live one.
    pub async fn start_stream(&self) -> Result<mpsc::Receiver<StreamEvent>, DomainError> {
        self.stop_stream().await;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut state = self.state.lock();

        let model = match state.model.clone() {
            Some(model) => model,
            None => {
                // capacity > 0, the channel is fresh
                let _ = tx.try_send(StreamEvent::error("Please select a language first"));
                return Ok(rx);
            }
        };

        let current = self.audio_state.load();
        if !current.can_start_recording() {
            return Err(DomainError::AudioStateTransition {
                from: current,
                to: AudioState::Recording,
            });
        }
        self.audio_state.store(AudioState::Recording);

        let recording = Arc::new(AtomicBool::new(true));
        let worker = StreamWorker {
            model,
            audio: Arc::clone(&self.audio),
            settings: self.settings.clone(),
            recording: Arc::clone(&recording),
            audio_state: Arc::clone(&self.audio_state),
            events: tx,
        };
        let handle = tokio::task::spawn_blocking(move || worker.run());

        state.active = Some(ActiveStream {
            recording,
            worker: handle,
        });
        Ok(rx)
    }

    /// Stop the live stream, if any, and wait for it to release the device.
    pub async fn stop_stream(&self) {
        let active = self.state.lock().active.take();
        let Some(active) = active else {
            return;
        };

        active.recording.store(false, Ordering::Release);
        if self.audio_state.load().can_stop_recording() {
            self.audio_state
                .compare_exchange(AudioState::Recording, AudioState::Stopping);
        }

        match tokio::time::timeout(self.settings.grace, active.worker).await {
            Ok(Ok(())) => debug!("Recognition stream stopped"),
            Ok(Err(e)) => error!(error = %e, "Recognition worker panicked"),
            Err(_) => warn!(
                grace_ms = self.settings.grace.as_millis() as u64,
                "Recognition worker still releasing the device"
            ),
        }
    }
}

/// Everything the blocking capture loop owns.
struct StreamWorker {
    model: Arc<dyn RecognitionModel>,
    audio: Arc<dyn AudioSource>,
    settings: SessionSettings,
    recording: Arc<AtomicBool>,
    audio_state: Arc<AtomicAudioState>,
    events: mpsc::Sender<StreamEvent>,
}

impl StreamWorker {
    fn run(self) {
        let language = self.model.language();
        info!(%language, "Recognition stream started");

        if let Err(e) = self.capture(language) {
            error!(%language, error = %e, "Recognition stream failed");
            let _ = self.events.blocking_send(StreamEvent::error(e.to_string()));
        }

        self.recording.store(false, Ordering::Release);
        if !self
            .audio_state
            .compare_exchange(AudioState::Recording, AudioState::Idle)
        {
            self.audio_state
                .compare_exchange(AudioState::Stopping, AudioState::Idle);
        }
        info!(%language, "Recognition stream closed");
    }

    /// The capture stream lives in this scope and is dropped on every exit.
    /// The recognizer is reset however the stream ends.
    fn capture(&self, language: SignLanguage) -> Result<(), DomainError> {
        let audio = &self.settings.audio;
        let mut stream = self.audio.open(audio)?;
        let mut recognizer = self.model.recognizer(audio.sample_rate)?;
        let outcome = self.pump(stream.as_mut(), recognizer.as_mut(), language);
        recognizer.reset();
        outcome
    }

    fn pump(
        &self,
        stream: &mut dyn AudioStream,
        recognizer: &mut dyn StreamingRecognizer,
        language: SignLanguage,
    ) -> Result<(), DomainError> {
        let mut dispatcher =
            IncrementalDispatcher::new(language, self.settings.debounce, Instant::now());
        let mut frame = vec![0i16; self.settings.audio.frame_size];

        while self.recording.load(Ordering::Acquire) {
            let read = stream.read_frame(&mut frame)?;
            if read == 0 {
                continue;
            }

            let snapshot = match step(recognizer, &frame[..read]) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(error = %e, "Skipping audio frame");
                    continue;
                }
            };

            for event in dispatcher.process(&snapshot, Instant::now()) {
                if self.events.blocking_send(event).is_err() {
                    info!("Stream client disconnected");
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

/// Feed one frame and collect what the recognizer reported.
fn step(
    recognizer: &mut dyn StreamingRecognizer,
    frame: &[i16],
) -> Result<RecognitionSnapshot, DomainError> {
    let partial_text = recognizer.partial_result()?;
    let accepted_waveform = recognizer.accept_waveform(frame)?;
    let final_text = if accepted_waveform {
        recognizer.result()?
    } else {
        String::new()
    };
    Ok(RecognitionSnapshot {
        partial_text,
        accepted_waveform,
        final_text,
    })
}
