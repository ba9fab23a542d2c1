use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::adapters::keyword_analyzer::KeywordAnalyzer;
use crate::adapters::tagged_analyzer::TaggedAnalyzer;
use crate::domain::{AnalyzerMode, DomainError, GrammarContext};
use crate::ports::ContextAnalyzer;

/// Runs the primary analyzer and falls back to keywords for any call it
/// fails on. Never returns an error.
pub struct CompositeAnalyzer {
    primary: Box<dyn ContextAnalyzer>,
    fallback: KeywordAnalyzer,
}

impl CompositeAnalyzer {
    pub fn new(primary: Box<dyn ContextAnalyzer>) -> Self {
        Self {
            primary,
            fallback: KeywordAnalyzer,
        }
    }
}

impl ContextAnalyzer for CompositeAnalyzer {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    fn analyze(&self, text: &str) -> Result<GrammarContext, DomainError> {
        match self.primary.analyze(text) {
            Ok(context) => Ok(context),
            Err(e) => {
                warn!(
                    analyzer = self.primary.name(),
                    error = %e,
                    "Grammar analysis skipped, using keyword heuristics"
                );
                self.fallback.analyze(text)
            }
        }
    }
}

/// Pick the context analyzer for `mode`.
///
/// In auto mode the tagger is used when its lexicon (the override at
/// `tagger_lexicon`, else the built-in one) loads; otherwise keywords.
pub fn build_analyzer(
    mode: AnalyzerMode,
    tagger_lexicon: Option<&Path>,
) -> Arc<dyn ContextAnalyzer> {
    if mode == AnalyzerMode::Keyword {
        info!("Context analyzer: keyword");
        return Arc::new(KeywordAnalyzer);
    }

    let tagger = match tagger_lexicon {
        Some(path) => TaggedAnalyzer::from_file(path),
        None => TaggedAnalyzer::builtin(),
    };

    match tagger {
        Ok(tagger) => {
            info!("Context analyzer: tagged with keyword fallback");
            Arc::new(CompositeAnalyzer::new(Box::new(tagger)))
        }
        Err(e) => {
            warn!(error = %e, "Tagger unavailable, using basic text processing");
            Arc::new(KeywordAnalyzer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GrammarType;

    struct FailingAnalyzer;

    impl ContextAnalyzer for FailingAnalyzer {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn analyze(&self, _text: &str) -> Result<GrammarContext, DomainError> {
            Err(DomainError::Validation("cannot parse".to_string()))
        }
    }

    #[test]
    fn test_falls_back_per_call() {
        let analyzer = CompositeAnalyzer::new(Box::new(FailingAnalyzer));
        let ctx = analyzer.analyze("how are you").unwrap();
        assert_eq!(ctx.grammar_type, GrammarType::Question);
    }

    #[test]
    fn test_tagger_error_uses_keywords_for_that_call_only() {
        let analyzer = build_analyzer(AnalyzerMode::Auto, None);
        assert_eq!(analyzer.name(), "tagged");

        let ctx = analyzer.analyze("I am happy very").unwrap();
        assert!(ctx.emphasis.is_empty());
        assert_eq!(ctx.emotions, vec!["happy"]);

        let ctx = analyzer.analyze("I am very happy").unwrap();
        assert_eq!(ctx.emphasis, vec!["happy"]);
        assert_eq!(ctx.topicalization.as_deref(), Some("I"));
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(build_analyzer(AnalyzerMode::Keyword, None).name(), "keyword");

        let missing = Path::new("/nonexistent/tagger.toml");
        assert_eq!(build_analyzer(AnalyzerMode::Auto, Some(missing)).name(), "keyword");
    }
}
