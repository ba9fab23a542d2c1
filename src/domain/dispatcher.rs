use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::domain::language::SignLanguage;
use crate::domain::transcription::{RecognitionSnapshot, StreamEvent};

/// Turns per-frame recognizer snapshots into word events and transcript updates.
///
/// A partial hypothesis that grew by at least one token yields its last token as
/// a word, at most once per debounce window. A final result yields every token
/// not already present in the previous hypothesis, so consecutive repeats of a
/// word collapse into one event.
#[derive(Debug)]
pub struct IncrementalDispatcher {
    language: SignLanguage,
    debounce: Duration,
    last_text: String,
    last_word_time: Instant,
}

impl IncrementalDispatcher {
    /// `started_at` seeds the debounce clock, so no partial word is emitted
    /// during the first debounce window of a stream.
    pub fn new(language: SignLanguage, debounce: Duration, started_at: Instant) -> Self {
        Self {
            language,
            debounce,
            last_text: String::new(),
            last_word_time: started_at,
        }
    }

    pub fn language(&self) -> SignLanguage {
        self.language
    }

    /// Process one snapshot observed at `now`. Word events precede the transcript
    /// update they belong to.
    pub fn process(&mut self, snapshot: &RecognitionSnapshot, now: Instant) -> Vec<StreamEvent> {
        let mut events = Vec::new();

        let partial = snapshot.partial_text.trim();
        if !partial.is_empty() {
            self.on_partial(partial, now, &mut events);
        }

        if snapshot.accepted_waveform {
            self.on_final(&snapshot.final_text, now, &mut events);
        }

        events
    }

    fn on_partial(&mut self, partial: &str, now: Instant, events: &mut Vec<StreamEvent>) {
        let words: Vec<&str> = partial.split_whitespace().collect();
        let previous = self.last_text.split_whitespace().count();

        if words.len() > previous {
            if let Some(word) = words.last() {
                if now.saturating_duration_since(self.last_word_time) >= self.debounce {
                    events.push(StreamEvent::word(*word, self.language));
                    self.last_word_time = now;
                }
            }
        }

        events.push(StreamEvent::partial(partial));
        self.last_text = partial.to_string();
    }

    fn on_final(&mut self, text: &str, now: Instant, events: &mut Vec<StreamEvent>) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let seen: HashSet<&str> = self.last_text.split_whitespace().collect();
        let mut emitted = HashSet::new();
        for word in text.split_whitespace() {
            if !seen.contains(word) && emitted.insert(word) {
                events.push(StreamEvent::word(word, self.language));
                self.last_word_time = now;
            }
        }

        events.push(StreamEvent::full(text));
        self.last_text = text.to_string();
    }
}
