pub mod controller;
pub mod session;
pub mod speech;
pub mod translator;

pub use controller::AppController;
pub use session::{SessionManager, SessionSettings, SessionStatus};
pub use speech::{ProcessedAudio, SpeechService, SpeechTranscript};
pub use translator::{expressions_for, Translator};
