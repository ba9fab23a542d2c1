use crate::domain::{DomainError, GrammarContext, SignGrammar};

/// Port for deriving grammar context from input text.
pub trait ContextAnalyzer: Send + Sync {
    /// Name of the implementation, for logs.
    fn name(&self) -> &'static str;

    /// Analyze one sentence. Implementations may fail on input they cannot
    /// parse; callers decide whether to fall back.
    fn analyze(&self, text: &str) -> Result<GrammarContext, DomainError>;
}

/// Port for reordering text into sign-language grammar.
pub trait GrammarConverter: Send + Sync {
    /// Convert `text` for `target`, returning the sign token sequence.
    fn convert(&self, text: &str, target: SignGrammar, context: &GrammarContext) -> String;
}
