use serde::{Deserialize, Serialize};
use std::fmt;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Compound polarity above this is Positive, below the negation is Negative.
/// Both boundaries themselves fall in the Neutral band.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }

    /// Buckets a compound polarity score in [-1, 1] into a discrete label.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexicon-based polarity scoring over free-text answers.
pub struct SentimentAnalyzer {
    lexicon: SentimentIntensityAnalyzer<'static>,
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Compound polarity in [-1, 1]. Empty or lexicon-free text scores 0.
    pub fn polarity(&self, text: &str) -> f64 {
        self.lexicon
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }

    pub fn classify(&self, text: &str) -> SentimentLabel {
        SentimentLabel::from_polarity(self.polarity(text))
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(SentimentLabel::from_polarity(0.11), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(-0.11), SentimentLabel::Negative);
        // Both boundaries are inclusive to the Neutral band.
        assert_eq!(SentimentLabel::from_polarity(0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(-0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(1.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(-1.0), SentimentLabel::Negative);
    }

    #[test]
    fn empty_answer_is_neutral() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.polarity(""), 0.0);
        assert_eq!(analyzer.classify(""), SentimentLabel::Neutral);
    }

    #[test]
    fn obvious_polarity_is_detected() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(
            analyzer.classify("I love spending time with my friends, it makes me happy."),
            SentimentLabel::Positive
        );
        assert_eq!(
            analyzer.classify("I feel terrible and hopeless, everything is awful."),
            SentimentLabel::Negative
        );
    }
}
