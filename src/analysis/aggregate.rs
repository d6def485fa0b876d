//! Combines the per-question sentiment and facial-emotion labels into a
//! single qualitative risk tier.

use crate::analysis::emotion::EmotionLabel;
use crate::analysis::sentiment::SentimentLabel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskTier {
    NoConcerns,
    Mild,
    Significant,
}

impl RiskTier {
    pub fn message(self) -> &'static str {
        match self {
            RiskTier::NoConcerns => "No apparent mental health concerns detected.",
            RiskTier::Mild => {
                "Mild signs of emotional distress detected. Consider consultation if symptoms persist."
            }
            RiskTier::Significant => {
                "Several signs of emotional distress detected. It is recommended to consult a mental health professional."
            }
        }
    }

    fn from_count(count: usize) -> Self {
        match count {
            0 => RiskTier::NoConcerns,
            1..=3 => RiskTier::Mild,
            _ => RiskTier::Significant,
        }
    }
}

/// One increment per question with Negative text sentiment, and one more,
/// independently, per question whose facial label is in the negative set
/// (Sad, Fear, Angry, Disgust). Maximum of 2 per question.
pub fn negative_signal_count(text: &[SentimentLabel], face: &[EmotionLabel]) -> usize {
    text.iter()
        .zip(face)
        .map(|(sentiment, emotion)| {
            usize::from(*sentiment == SentimentLabel::Negative) + usize::from(emotion.is_negative())
        })
        .sum()
}

pub fn assess(text: &[SentimentLabel], face: &[EmotionLabel]) -> RiskTier {
    RiskTier::from_count(negative_signal_count(text, face))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_neutral_run_has_no_concerns() {
        let text = vec![SentimentLabel::Neutral; 10];
        let face = vec![EmotionLabel::Neutral; 10];
        assert_eq!(negative_signal_count(&text, &face), 0);
        assert_eq!(assess(&text, &face), RiskTier::NoConcerns);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(RiskTier::from_count(0), RiskTier::NoConcerns);
        assert_eq!(RiskTier::from_count(1), RiskTier::Mild);
        assert_eq!(RiskTier::from_count(3), RiskTier::Mild);
        assert_eq!(RiskTier::from_count(4), RiskTier::Significant);
        assert_eq!(RiskTier::from_count(20), RiskTier::Significant);
    }

    #[test]
    fn both_signals_count_independently() {
        let text = vec![SentimentLabel::Negative, SentimentLabel::Positive];
        let face = vec![EmotionLabel::Sad, EmotionLabel::Fear];
        // Question 1 contributes 2, question 2 contributes 1.
        assert_eq!(negative_signal_count(&text, &face), 3);
        assert_eq!(assess(&text, &face), RiskTier::Mild);
    }

    #[test]
    fn happy_and_no_face_never_count() {
        let text = vec![SentimentLabel::Neutral; 4];
        let face = vec![
            EmotionLabel::Happy,
            EmotionLabel::Surprise,
            EmotionLabel::Neutral,
            EmotionLabel::NoFace,
        ];
        assert_eq!(negative_signal_count(&text, &face), 0);
    }

    #[test]
    fn four_negative_answers_with_happy_faces_are_significant() {
        let text = vec![SentimentLabel::Negative; 4];
        let face = vec![EmotionLabel::Happy; 4];
        assert_eq!(negative_signal_count(&text, &face), 4);
        assert_eq!(assess(&text, &face), RiskTier::Significant);
    }

    #[test]
    fn tier_messages_are_fixed() {
        assert_eq!(
            RiskTier::NoConcerns.message(),
            "No apparent mental health concerns detected."
        );
        assert!(RiskTier::Mild.message().starts_with("Mild signs"));
        assert!(RiskTier::Significant.message().starts_with("Several signs"));
    }
}
