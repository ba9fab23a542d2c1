use crate::domain::{GrammarContext, SignGrammar};
use crate::ports::GrammarConverter;

/// Grammar converter that keeps the spoken word order for both targets.
///
/// Signs are resolved token by token from the input as written; the
/// analyzer's markers still drive expression cues.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughConverter;

impl GrammarConverter for PassThroughConverter {
    fn convert(&self, text: &str, _target: SignGrammar, _context: &GrammarContext) -> String {
        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_for_both_targets() {
        let converter = PassThroughConverter;
        let ctx = GrammarContext::default();

        let input = "  where is the library ";
        assert_eq!(
            converter.convert(input, SignGrammar::Asl, &ctx),
            "where is the library"
        );
        assert_eq!(
            converter.convert(input, SignGrammar::Isl, &ctx),
            "where is the library"
        );
    }
}
