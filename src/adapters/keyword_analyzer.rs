use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::domain::{DomainError, GrammarContext, GrammarType};
use crate::ports::ContextAnalyzer;

static QUESTION_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["what", "who", "where", "when", "why", "how"]
        .into_iter()
        .collect()
});

static NEGATION_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["not", "no", "never", "nahi"].into_iter().collect());

static CONDITIONAL_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["if", "when", "suppose"].into_iter().collect());

static FUTURE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["will", "going", "future", "tomorrow", "later"]
        .into_iter()
        .collect()
});

static PAST_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["was", "were", "had", "yesterday", "ago"]
        .into_iter()
        .collect()
});

static INTENSIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["very", "really", "extremely", "absolutely"]
        .into_iter()
        .collect()
});

/// Emotion families and the words that signal them, in report order.
const EMOTIONS: [(&str, &[&str]); 4] = [
    ("happy", &["happy", "joy", "glad", "excited"]),
    ("sad", &["sad", "unhappy", "depressed"]),
    ("angry", &["angry", "mad", "furious"]),
    ("surprised", &["surprised", "shocked", "amazed"]),
];

/// Split on whitespace and strip surrounding punctuation, keeping case and
/// inner apostrophes.
pub(crate) fn words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .filter(|w| !w.is_empty())
        .collect()
}

pub(crate) fn is_negation(lower: &str) -> bool {
    NEGATION_WORDS.contains(lower) || lower.ends_with("n't")
}

/// Uppercase tokens longer than one character read as shouted.
pub(crate) fn is_shouted(word: &str) -> bool {
    word.chars().count() > 1
        && word.chars().any(char::is_alphabetic)
        && !word.chars().any(char::is_lowercase)
}

/// Append each emotion word found as an emotion and its expression marker.
pub(crate) fn detect_emotions(words: &[&str], context: &mut GrammarContext) {
    for word in words {
        let lower = word.to_lowercase();
        for (emotion, indicators) in EMOTIONS {
            if indicators.contains(&lower.as_str()) {
                context.emotions.push(emotion.to_string());
                context.push_marker(&format!("{}_expression", emotion));
            }
        }
    }
}

/// Keyword heuristics used when no tagger is available or tagging fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAnalyzer;

impl ContextAnalyzer for KeywordAnalyzer {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn analyze(&self, text: &str) -> Result<GrammarContext, DomainError> {
        let words = words(text);
        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let has = |set: &HashSet<&'static str>| lower.iter().any(|w| set.contains(w.as_str()));

        let mut context = GrammarContext::default();

        if has(&QUESTION_WORDS) {
            context.grammar_type = GrammarType::Question;
            context.push_marker("raised_eyebrows");
        } else if lower.iter().any(|w| is_negation(w)) {
            context.grammar_type = GrammarType::Negative;
            context.push_marker("head_shake");
        }

        if has(&CONDITIONAL_WORDS) {
            context.push_marker("tilted_head");
        }

        if has(&FUTURE_WORDS) {
            context.push_marker("forward_head_tilt");
        } else if has(&PAST_WORDS) {
            context.push_marker("backward_head_tilt");
        }

        for (i, word) in words.iter().enumerate() {
            if is_shouted(word) {
                context.emphasis.push(word.to_string());
                context.push_marker("head_nod");
            }
            if INTENSIFIERS.contains(lower[i].as_str()) {
                if let Some(next) = words.get(i + 1) {
                    context.emphasis.push(next.to_string());
                    context.push_marker("slow_movement");
                }
            }
        }

        detect_emotions(&words, &mut context);

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_words() {
        let ctx = KeywordAnalyzer.analyze("Where is the library?").unwrap();
        assert_eq!(ctx.grammar_type, GrammarType::Question);
        assert_eq!(ctx.non_manual_markers, vec!["raised_eyebrows"]);
    }

    #[test]
    fn test_negation() {
        let ctx = KeywordAnalyzer.analyze("I don't like rain").unwrap();
        assert_eq!(ctx.grammar_type, GrammarType::Negative);
        assert!(ctx.has_marker("head_shake"));
    }

    #[test]
    fn test_time_cues_prefer_future() {
        let ctx = KeywordAnalyzer.analyze("it was cold, tomorrow will be warm").unwrap();
        assert!(ctx.has_marker("forward_head_tilt"));
        assert!(!ctx.has_marker("backward_head_tilt"));

        let ctx = KeywordAnalyzer.analyze("we met yesterday").unwrap();
        assert!(ctx.has_marker("backward_head_tilt"));
    }

    #[test]
    fn test_emotions_in_order() {
        let ctx = KeywordAnalyzer.analyze("I was sad but now I am happy").unwrap();
        assert_eq!(ctx.emotions, vec!["sad", "happy"]);
        assert!(ctx.has_marker("sad_expression"));
        assert!(ctx.has_marker("happy_expression"));
    }

    #[test]
    fn test_emphasis() {
        let ctx = KeywordAnalyzer.analyze("that is VERY really good").unwrap();
        assert_eq!(ctx.emphasis, vec!["VERY", "really", "good"]);
        assert!(ctx.has_marker("head_nod"));
        assert!(ctx.has_marker("slow_movement"));

        // trailing intensifier has nothing to emphasize
        let ctx = KeywordAnalyzer.analyze("thanks very").unwrap();
        assert!(ctx.emphasis.is_empty());
    }

    #[test]
    fn test_plain_statement() {
        let ctx = KeywordAnalyzer.analyze("hello").unwrap();
        assert_eq!(ctx.grammar_type, GrammarType::Statement);
        assert!(ctx.non_manual_markers.is_empty());
        assert!(!is_shouted("I"));
        assert!(is_shouted("OK"));
    }
}
