use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::Serialize;

/// Coarse sentiment of a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Polarity above 0.1 is positive, below -0.1 negative.
    pub fn from_polarity(polarity: f32) -> Self {
        if polarity > 0.1 {
            Sentiment::Positive
        } else if polarity < -0.1 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

static POLARITY: Lazy<HashMap<&'static str, f32>> = Lazy::new(|| {
    [
        ("good", 0.7),
        ("great", 0.8),
        ("excellent", 1.0),
        ("amazing", 0.6),
        ("wonderful", 1.0),
        ("perfect", 1.0),
        ("nice", 0.6),
        ("happy", 0.8),
        ("glad", 0.5),
        ("love", 0.5),
        ("like", 0.3),
        ("thank", 0.4),
        ("thanks", 0.4),
        ("helpful", 0.5),
        ("beautiful", 0.85),
        ("best", 1.0),
        ("better", 0.5),
        ("sunny", 0.3),
        ("warm", 0.6),
        ("fine", 0.4),
        ("bad", -0.7),
        ("terrible", -1.0),
        ("awful", -1.0),
        ("horrible", -1.0),
        ("worst", -1.0),
        ("worse", -0.4),
        ("sad", -0.5),
        ("unhappy", -0.6),
        ("angry", -0.5),
        ("mad", -0.6),
        ("hate", -0.8),
        ("sorry", -0.5),
        ("poor", -0.4),
        ("wrong", -0.5),
        ("sick", -0.7),
        ("cold", -0.6),
        ("stormy", -0.4),
    ]
    .into_iter()
    .collect()
});

static NEGATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["not", "no", "never", "don't", "dont", "isn't", "wasn't", "nahi"]
        .into_iter()
        .collect()
});

static INTENSIFIERS: Lazy<HashMap<&'static str, f32>> = Lazy::new(|| {
    [
        ("very", 1.3),
        ("really", 1.3),
        ("so", 1.2),
        ("extremely", 1.5),
        ("absolutely", 1.5),
        ("slightly", 0.6),
    ]
    .into_iter()
    .collect()
});

/// Mean polarity of the opinion words in `text`, in `[-1.0, 1.0]`.
///
/// A negator flips and halves the next opinion word; intensifiers scale it.
pub fn polarity(text: &str) -> f32 {
    let mut scores = Vec::new();
    let mut negate = false;
    let mut scale = 1.0f32;

    for raw in text.split_whitespace() {
        let word = raw
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
            .to_lowercase();
        let word = word.as_str();

        if NEGATORS.contains(word) {
            negate = true;
            continue;
        }
        if let Some(factor) = INTENSIFIERS.get(word) {
            scale *= factor;
            continue;
        }
        if let Some(&score) = POLARITY.get(word) {
            let mut score = score * scale;
            if negate {
                score *= -0.5;
            }
            scores.push(score.clamp(-1.0, 1.0));
        }
        negate = false;
        scale = 1.0;
    }

    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f32>() / scores.len() as f32
}

pub fn analyze(text: &str) -> Sentiment {
    Sentiment::from_polarity(polarity(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(Sentiment::from_polarity(0.11), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(0.1), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(-0.1), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(-0.2), Sentiment::Negative);
    }

    #[test]
    fn test_analyze() {
        assert_eq!(analyze("The weather is great today"), Sentiment::Positive);
        assert_eq!(analyze("what a terrible storm"), Sentiment::Negative);
        assert_eq!(analyze("it will rain tomorrow"), Sentiment::Neutral);
        assert_eq!(analyze("this is not good"), Sentiment::Negative);
    }

    #[test]
    fn test_intensifier_is_bounded() {
        let p = polarity("absolutely extremely perfect!");
        assert!(p <= 1.0 && p > 0.9);
    }
}
