use serde::{Deserialize, Serialize};

use crate::domain::language::SignLanguage;

/// Sentence type detected by a context analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarType {
    #[default]
    Statement,
    Question,
    Negative,
}

/// Grammatical facts about one input sentence, used to pick non-manual markers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarContext {
    pub subject: Option<String>,
    pub tense: Option<String>,
    pub mood: Option<String>,
    pub topic: Option<String>,
    pub emotions: Vec<String>,
    pub grammar_type: GrammarType,
    /// Non-manual markers in the order they were detected. May repeat.
    pub non_manual_markers: Vec<String>,
    /// Emphasized tokens.
    pub emphasis: Vec<String>,
    /// Sentence-initial subject moved to topic position.
    pub topicalization: Option<String>,
}

impl GrammarContext {
    pub fn push_marker(&mut self, marker: &str) {
        self.non_manual_markers.push(marker.to_string());
    }

    #[cfg(test)]
    pub fn has_marker(&self, marker: &str) -> bool {
        self.non_manual_markers.iter().any(|m| m == marker)
    }
}

/// Grammar target a sentence is converted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignGrammar {
    Asl,
    Isl,
}

impl From<SignLanguage> for SignGrammar {
    fn from(language: SignLanguage) -> Self {
        match language {
            SignLanguage::Isl => SignGrammar::Isl,
            _ => SignGrammar::Asl,
        }
    }
}

/// Output of the translation orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationResult {
    /// Ordered media references to play.
    pub signs: Vec<String>,
    /// Expression cues derived from the context's markers.
    pub expressions: Vec<String>,
    pub context: GrammarContext,
}
