use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{DomainError, GrammarContext, SignGrammar, SignLanguage, SignResolver, TranslationResult};
use crate::ports::{ContextAnalyzer, GrammarConverter};

/// Expression cue for each non-manual marker.
const EXPRESSION_CUES: [(&str, &str); 12] = [
    ("raised_eyebrows", "eyebrows_up"),
    ("head_shake", "shake_horizontal"),
    ("head_nod", "nod_vertical"),
    ("tilted_head", "head_tilt"),
    ("forward_head_tilt", "tilt_forward"),
    ("backward_head_tilt", "tilt_backward"),
    ("furrowed_brows", "eyebrows_down"),
    ("slow_movement", "slow_motion"),
    ("happy_expression", "smile"),
    ("sad_expression", "frown"),
    ("angry_expression", "angry_face"),
    ("surprised_expression", "wide_eyes"),
];

/// Expression cues for the context's markers, first occurrence order,
/// without repeats. Unknown markers have no cue.
pub fn expressions_for(context: &GrammarContext) -> Vec<String> {
    let mut cues: Vec<String> = Vec::new();
    for marker in &context.non_manual_markers {
        let cue = EXPRESSION_CUES
            .iter()
            .find(|(m, _)| m == marker)
            .map(|(_, cue)| *cue);
        if let Some(cue) = cue {
            if !cues.iter().any(|c| c == cue) {
                cues.push(cue.to_string());
            }
        }
    }
    cues
}

/// Text to signs: analysis, grammar conversion, sign lookup and expressions.
pub struct Translator {
    analyzer: Arc<dyn ContextAnalyzer>,
    converter: Arc<dyn GrammarConverter>,
    resolver: Arc<SignResolver>,
}

impl Translator {
    pub fn new(
        analyzer: Arc<dyn ContextAnalyzer>,
        converter: Arc<dyn GrammarConverter>,
        resolver: Arc<SignResolver>,
    ) -> Self {
        Self {
            analyzer,
            converter,
            resolver,
        }
    }

    pub fn analyzer_name(&self) -> &'static str {
        self.analyzer.name()
    }

    /// Translate one sentence.
    ///
    /// Fails with `Validation` for blank text and `ResolutionMiss` when not
    /// even the not-understood clip is available.
    pub fn translate(
        &self,
        text: &str,
        language: SignLanguage,
    ) -> Result<TranslationResult, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation("No text provided".to_string()));
        }

        let context = self.analyze(text);
        let converted = self
            .converter
            .convert(text, SignGrammar::from(language), &context);
        let signs = self.resolver.resolve_or_fallback(&converted, language);
        if signs.is_empty() {
            return Err(DomainError::ResolutionMiss);
        }

        let expressions = expressions_for(&context);
        debug!(
            %language,
            signs = signs.len(),
            expressions = ?expressions,
            "Text translated"
        );

        Ok(TranslationResult {
            signs,
            expressions,
            context,
        })
    }

    /// Grammar context of `text`. Analysis failures yield an empty context.
    pub fn analyze(&self, text: &str) -> GrammarContext {
        self.analyzer.analyze(text).unwrap_or_else(|e| {
            warn!(error = %e, "Context analysis failed, continuing without markers");
            GrammarContext::default()
        })
    }

    /// Sign references for a transcript, falling back to the not-understood
    /// clip. Empty when nothing, not even the fallback, is available.
    pub fn signs_for(&self, text: &str, language: SignLanguage) -> Vec<String> {
        self.resolver.resolve_or_fallback(text, language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{build_analyzer, KeywordAnalyzer, PassThroughConverter};
    use crate::domain::{AnalyzerMode, Lexicon, MediaCatalog, MediaCategory};

    fn resolver(with_fallback: bool) -> Arc<SignResolver> {
        let mut files = vec![
            (MediaCategory::Videos, "hello.mp4"),
            (MediaCategory::Videos, "library.mp4"),
            (MediaCategory::AslLetters, "X_test.jpg"),
            (MediaCategory::AslLetters, "SPACE_test.jpg"),
        ];
        if with_fallback {
            files.push((MediaCategory::Videos, "not_understand.mp4"));
        }
        Arc::new(SignResolver::new(
            Arc::new(Lexicon::builtin().unwrap()),
            Arc::new(MediaCatalog::from_files(files)),
            "not_understand.mp4",
        ))
    }

    fn translator(with_fallback: bool) -> Translator {
        Translator::new(
            build_analyzer(AnalyzerMode::Auto, None),
            Arc::new(PassThroughConverter),
            resolver(with_fallback),
        )
    }

    #[test]
    fn test_expressions_dedup_in_order() {
        let mut ctx = GrammarContext::default();
        for marker in ["raised_eyebrows", "furrowed_brows", "raised_eyebrows", "unknown"] {
            ctx.push_marker(marker);
        }
        assert_eq!(expressions_for(&ctx), vec!["eyebrows_up", "eyebrows_down"]);
    }

    #[test]
    fn test_translate_question() {
        let result = translator(true).translate("What library", SignLanguage::Asl).unwrap();
        assert_eq!(result.signs.last().map(String::as_str), Some("mp4videos/library.mp4"));
        assert_eq!(result.expressions, vec!["eyebrows_up", "eyebrows_down"]);
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let err = translator(true).translate("   ", SignLanguage::Asl).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_unresolvable_text() {
        let result = translator(true).translate("???", SignLanguage::Asl).unwrap();
        assert_eq!(result.signs, vec!["mp4videos/not_understand.mp4"]);

        let err = translator(false).translate("???", SignLanguage::Asl).unwrap_err();
        assert!(matches!(err, DomainError::ResolutionMiss));
    }

    #[test]
    fn test_keyword_analyzer_markers_flow_into_expressions() {
        let t = Translator::new(
            Arc::new(KeywordAnalyzer),
            Arc::new(PassThroughConverter),
            resolver(true),
        );
        let result = t.translate("hello I am happy", SignLanguage::Isl).unwrap();
        assert_eq!(result.expressions, vec!["smile"]);
        assert_eq!(t.analyzer_name(), "keyword");
    }
}
