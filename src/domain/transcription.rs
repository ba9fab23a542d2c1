use serde::Serialize;
use zeroize::Zeroize;

use crate::domain::language::SignLanguage;

/// Audio buffer that is securely zeroed on drop.
/// Uploaded and captured audio is cleared from memory once it has been decoded.
#[derive(Debug, Zeroize)]
#[zeroize(drop)]
pub struct AudioBuffer {
    /// PCM audio samples (16-bit mono).
    samples: Vec<i16>,
    /// Sample rate in Hz.
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a new empty audio buffer.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    /// Create an audio buffer with pre-allocated capacity.
    pub fn with_capacity(sample_rate: u32, capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            sample_rate,
        }
    }

    /// Append samples to the buffer.
    pub fn push_samples(&mut self, samples: &[i16]) {
        self.samples.extend_from_slice(samples);
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate.max(1) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Drop the first `count` samples, zeroing them first.
    pub fn drain_front(&mut self, count: usize) {
        let count = count.min(self.samples.len());
        self.samples[..count].zeroize();
        self.samples.drain(..count);
    }

    /// Clear the buffer (samples are zeroed due to Zeroize).
    pub fn clear(&mut self) {
        self.samples.zeroize();
        self.samples.clear();
    }
}

/// What a streaming recognizer reported after one audio frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionSnapshot {
    /// Current partial hypothesis (read before the frame was accepted).
    pub partial_text: String,
    /// The recognizer closed an utterance with this frame.
    pub accepted_waveform: bool,
    /// Final text of the closed utterance; empty unless `accepted_waveform`.
    pub final_text: String,
}

impl RecognitionSnapshot {
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            partial_text: text.into(),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn finalized(partial: impl Into<String>, final_text: impl Into<String>) -> Self {
        Self {
            partial_text: partial.into(),
            accepted_waveform: true,
            final_text: final_text.into(),
        }
    }
}

/// One server-sent event on the recognition stream.
///
/// Serialized untagged so each variant keeps the wire shape clients expect:
/// `{partial}`, `{text, is_full}`, `{text, language, is_word}` or `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Partial {
        partial: String,
    },
    Full {
        text: String,
        is_full: bool,
    },
    Word {
        text: String,
        language: SignLanguage,
        is_word: bool,
    },
    Error {
        error: String,
    },
}

impl StreamEvent {
    pub fn partial(text: impl Into<String>) -> Self {
        StreamEvent::Partial {
            partial: text.into(),
        }
    }

    pub fn full(text: impl Into<String>) -> Self {
        StreamEvent::Full {
            text: text.into(),
            is_full: true,
        }
    }

    pub fn word(text: impl Into<String>, language: SignLanguage) -> Self {
        StreamEvent::Word {
            text: text.into(),
            language,
            is_word: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        StreamEvent::Error {
            error: message.into(),
        }
    }
}
