use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::adapters::keyword_analyzer::{detect_emotions, is_negation, is_shouted, words};
use crate::domain::{DomainError, GrammarContext, GrammarType};
use crate::ports::ContextAnalyzer;

const BUILTIN_TAGGER: &str = include_str!("../../resources/tagger.toml");

#[derive(Debug, Deserialize)]
struct TaggerFile {
    classes: Classes,
    cues: Cues,
    auxiliaries: Auxiliaries,
    verbs: Verbs,
}

#[derive(Debug, Deserialize)]
struct Classes {
    wh_pronouns: Vec<String>,
    wh_words: Vec<String>,
    negations: Vec<String>,
    subject_pronouns: Vec<String>,
    determiners: Vec<String>,
    prepositions: Vec<String>,
    intensifiers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Cues {
    conditional: Vec<String>,
    future: Vec<String>,
    past: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Auxiliaries {
    words: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Verbs {
    present: Vec<String>,
    past: Vec<String>,
    untensed: Vec<String>,
    #[serde(default)]
    past_suffixes: Vec<String>,
}

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    WhPronoun,
    WhAdverb,
    Negation,
    Pronoun,
    Determiner,
    Preposition,
    Intensifier,
    Auxiliary,
    Verb(Option<Tense>),
    Noun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tense {
    Past,
    Present,
}

impl Tense {
    fn label(self) -> &'static str {
        match self {
            Tense::Past => "Past",
            Tense::Present => "Pres",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken<'a> {
    pub text: &'a str,
    pub lower: String,
    pub tag: Tag,
}

fn word_set(words: Vec<String>) -> HashSet<String> {
    words.into_iter().map(|w| w.trim().to_lowercase()).collect()
}

/// Context analyzer over a lexicon-driven tagger.
#[derive(Debug)]
pub struct TaggedAnalyzer {
    wh_pronouns: HashSet<String>,
    wh_words: HashSet<String>,
    negations: HashSet<String>,
    subject_pronouns: HashSet<String>,
    determiners: HashSet<String>,
    prepositions: HashSet<String>,
    intensifiers: HashSet<String>,
    conditional: HashSet<String>,
    future: HashSet<String>,
    past: HashSet<String>,
    auxiliaries: HashSet<String>,
    present_verbs: HashSet<String>,
    past_verbs: HashSet<String>,
    untensed_verbs: HashSet<String>,
    past_suffixes: Vec<String>,
}

impl TaggedAnalyzer {
    /// Tagger over the built-in word classes.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_toml_str(BUILTIN_TAGGER)
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let content = fs::read_to_string(path)?;
        let analyzer = Self::from_toml_str(&content)?;
        info!(path = ?path, "Tagger lexicon loaded");
        Ok(analyzer)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        let file: TaggerFile = toml::from_str(content)?;

        let required = [
            ("classes.wh_pronouns", file.classes.wh_pronouns.is_empty()),
            ("classes.negations", file.classes.negations.is_empty()),
            ("classes.subject_pronouns", file.classes.subject_pronouns.is_empty()),
            ("auxiliaries.words", file.auxiliaries.words.is_empty()),
            ("verbs.present", file.verbs.present.is_empty()),
            ("verbs.past", file.verbs.past.is_empty()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, empty)| *empty) {
            return Err(DomainError::Config(format!("Tagger lexicon has no {}", name)));
        }

        Ok(Self {
            wh_pronouns: word_set(file.classes.wh_pronouns),
            wh_words: word_set(file.classes.wh_words),
            negations: word_set(file.classes.negations),
            subject_pronouns: word_set(file.classes.subject_pronouns),
            determiners: word_set(file.classes.determiners),
            prepositions: word_set(file.classes.prepositions),
            intensifiers: word_set(file.classes.intensifiers),
            conditional: word_set(file.cues.conditional),
            future: word_set(file.cues.future),
            past: word_set(file.cues.past),
            auxiliaries: word_set(file.auxiliaries.words),
            present_verbs: word_set(file.verbs.present),
            past_verbs: word_set(file.verbs.past),
            untensed_verbs: word_set(file.verbs.untensed),
            past_suffixes: file.verbs.past_suffixes,
        })
    }

    fn tag_word(&self, lower: &str) -> Tag {
        if self.wh_pronouns.contains(lower) {
            Tag::WhPronoun
        } else if self.wh_words.contains(lower) {
            Tag::WhAdverb
        } else if self.negations.contains(lower) || is_negation(lower) {
            Tag::Negation
        } else if self.subject_pronouns.contains(lower) {
            Tag::Pronoun
        } else if self.determiners.contains(lower) {
            Tag::Determiner
        } else if self.prepositions.contains(lower) {
            Tag::Preposition
        } else if self.intensifiers.contains(lower) {
            Tag::Intensifier
        } else if self.auxiliaries.contains(lower) {
            Tag::Auxiliary
        } else if self.past_verbs.contains(lower) {
            Tag::Verb(Some(Tense::Past))
        } else if self.present_verbs.contains(lower) {
            Tag::Verb(Some(Tense::Present))
        } else if self.untensed_verbs.contains(lower) {
            Tag::Verb(None)
        } else if lower.chars().count() > 3
            && self.past_suffixes.iter().any(|s| lower.ends_with(s.as_str()))
        {
            Tag::Verb(Some(Tense::Past))
        } else {
            Tag::Noun
        }
    }

    pub fn tag<'a>(&self, text: &'a str) -> Vec<TaggedToken<'a>> {
        words(text)
            .into_iter()
            .map(|w| {
                let lower = w.to_lowercase();
                let tag = self.tag_word(&lower);
                TaggedToken { text: w, lower, tag }
            })
            .collect()
    }

    /// Index of the subject: the last pronoun before the main verb (or the
    /// first auxiliary when there is none), else the last noun before it.
    fn subject_index(tokens: &[TaggedToken<'_>]) -> Option<usize> {
        let verb_at = tokens
            .iter()
            .position(|t| matches!(t.tag, Tag::Verb(_)))
            .or_else(|| tokens.iter().position(|t| t.tag == Tag::Auxiliary))?;
        let before = &tokens[..verb_at];
        before
            .iter()
            .rposition(|t| t.tag == Tag::Pronoun)
            .or_else(|| before.iter().rposition(|t| t.tag == Tag::Noun))
    }

    fn structure(&self, tokens: &[TaggedToken<'_>], context: &mut GrammarContext) {
        if tokens.iter().any(|t| t.tag == Tag::WhPronoun) {
            context.grammar_type = GrammarType::Question;
            context.push_marker("raised_eyebrows");
        } else if tokens.iter().any(|t| t.tag == Tag::Negation) {
            context.grammar_type = GrammarType::Negative;
            context.push_marker("head_shake");
        }

        if let Some(i) = Self::subject_index(tokens) {
            context.subject = Some(tokens[i].text.to_string());
            if i == 0 {
                context.topic = Some(tokens[i].text.to_string());
                context.topicalization = context.topic.clone();
                context.push_marker("raised_eyebrows");
            }
        }

        for token in tokens {
            if let Tag::Verb(tense) = token.tag {
                let label = tense.map(Tense::label).unwrap_or("present");
                context.tense = Some(label.to_string());
            }
        }
    }

    fn markers(&self, tokens: &[TaggedToken<'_>], context: &mut GrammarContext) {
        let has = |set: &HashSet<String>| tokens.iter().any(|t| set.contains(&t.lower));

        if context.grammar_type == GrammarType::Question && has(&self.wh_words) {
            context.push_marker("furrowed_brows");
        }

        if has(&self.conditional) {
            context.push_marker("tilted_head");
        }

        if has(&self.future) {
            context.push_marker("forward_head_tilt");
        } else if has(&self.past) {
            context.push_marker("backward_head_tilt");
        }
    }

    fn emphasis(
        &self,
        tokens: &[TaggedToken<'_>],
        context: &mut GrammarContext,
    ) -> Result<(), DomainError> {
        for (i, token) in tokens.iter().enumerate() {
            if is_shouted(token.text) {
                context.emphasis.push(token.text.to_string());
                context.push_marker("head_nod");
            }
            if token.tag == Tag::Intensifier {
                let next = tokens.get(i + 1).ok_or_else(|| {
                    DomainError::Validation(format!(
                        "Intensifier '{}' has no word to modify",
                        token.text
                    ))
                })?;
                context.emphasis.push(next.text.to_string());
                context.push_marker("slow_movement");
            }
        }
        Ok(())
    }
}

impl ContextAnalyzer for TaggedAnalyzer {
    fn name(&self) -> &'static str {
        "tagged"
    }

    fn analyze(&self, text: &str) -> Result<GrammarContext, DomainError> {
        let tokens = self.tag(text);
        let mut context = GrammarContext::default();

        self.structure(&tokens, &mut context);
        self.markers(&tokens, &mut context);
        self.emphasis(&tokens, &mut context)?;

        let plain: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        detect_emotions(&plain, &mut context);

        debug!(
            tokens = tokens.len(),
            grammar_type = ?context.grammar_type,
            markers = ?context.non_manual_markers,
            "Tagged analysis complete"
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> TaggedAnalyzer {
        TaggedAnalyzer::builtin().unwrap()
    }

    #[test]
    fn test_builtin_lexicon_loads() {
        let a = analyzer();
        let tags: Vec<Tag> = a.tag("she didn't go").into_iter().map(|t| t.tag).collect();
        assert_eq!(
            tags,
            vec![Tag::Pronoun, Tag::Negation, Tag::Verb(Some(Tense::Present))]
        );
    }

    #[test]
    fn test_wh_pronoun_question() {
        let ctx = analyzer().analyze("What do you want?").unwrap();
        assert_eq!(ctx.grammar_type, GrammarType::Question);
        assert_eq!(ctx.subject.as_deref(), Some("you"));
        assert_eq!(ctx.topicalization, None);
        assert_eq!(
            ctx.non_manual_markers,
            vec!["raised_eyebrows", "furrowed_brows"]
        );
    }

    #[test]
    fn test_where_is_not_a_wh_pronoun() {
        let ctx = analyzer().analyze("where is the library").unwrap();
        assert_eq!(ctx.grammar_type, GrammarType::Statement);
        assert!(!ctx.has_marker("furrowed_brows"));
    }

    #[test]
    fn test_negative_with_topicalized_subject() {
        let ctx = analyzer().analyze("I do not like rain").unwrap();
        assert_eq!(ctx.grammar_type, GrammarType::Negative);
        assert_eq!(ctx.subject.as_deref(), Some("I"));
        assert_eq!(ctx.topicalization.as_deref(), Some("I"));
        assert_eq!(ctx.topic, ctx.topicalization);
        assert_eq!(ctx.tense.as_deref(), Some("Pres"));
        assert_eq!(ctx.non_manual_markers, vec!["head_shake", "raised_eyebrows"]);
    }

    #[test]
    fn test_tense_last_verb_wins() {
        let ctx = analyzer().analyze("they wanted to go").unwrap();
        assert_eq!(ctx.tense.as_deref(), Some("Pres"));

        let ctx = analyzer().analyze("we are going").unwrap();
        assert_eq!(ctx.tense.as_deref(), Some("present"));

        let ctx = analyzer().analyze("the dog jumped").unwrap();
        assert_eq!(ctx.subject.as_deref(), Some("dog"));
        assert_eq!(ctx.tense.as_deref(), Some("Past"));
        assert_eq!(ctx.topicalization, None);
    }

    #[test]
    fn test_conditional_and_time_cues() {
        let ctx = analyzer().analyze("if it rains tomorrow").unwrap();
        assert!(ctx.has_marker("tilted_head"));
        assert!(ctx.has_marker("forward_head_tilt"));

        let ctx = analyzer().analyze("it rained yesterday").unwrap();
        assert!(ctx.has_marker("backward_head_tilt"));
    }

    #[test]
    fn test_emphasis_and_emotion() {
        let ctx = analyzer().analyze("I am very happy and NOT sad").unwrap();
        assert_eq!(ctx.emphasis, vec!["happy", "NOT"]);
        assert!(ctx.has_marker("slow_movement"));
        assert!(ctx.has_marker("head_nod"));
        assert_eq!(ctx.emotions, vec!["happy", "sad"]);
    }

    #[test]
    fn test_trailing_intensifier_is_an_error() {
        let err = analyzer().analyze("thank you very").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_rejects_incomplete_lexicon() {
        let content = BUILTIN_TAGGER.replace(
            "wh_pronouns = [\"what\", \"who\", \"whom\", \"whose\", \"whoever\", \"whatever\"]",
            "wh_pronouns = []",
        );
        assert!(matches!(
            TaggedAnalyzer::from_toml_str(&content),
            Err(DomainError::Config(_))
        ));
        assert!(TaggedAnalyzer::from_toml_str("not a lexicon").is_err());
    }
}
