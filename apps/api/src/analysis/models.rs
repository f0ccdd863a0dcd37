use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Maximum drift of a score distribution's sum from 1.0 before it is rejected.
pub const SCORE_SUM_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("Unknown sentiment label '{0}'")]
    UnknownLabel(String),

    #[error("Score '{field}' must be a finite value in [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Score distribution must sum to 1.0, got {sum}")]
    BadSum { sum: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            "positive" => Ok(SentimentLabel::Positive),
            _ => Err(ScoreError::UnknownLabel(s.to_string())),
        }
    }
}

impl TryFrom<String> for SentimentLabel {
    type Error = ScoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Three-way sentiment distribution as produced by the classifier.
/// Stored flat in `sentiment_records` (`negative`, `neutral`, `positive` columns).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SentimentScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl SentimentScores {
    /// Used for text too short to classify.
    pub const NEUTRAL_BASELINE: SentimentScores = SentimentScores {
        negative: 0.33,
        neutral: 0.34,
        positive: 0.33,
    };

    /// Rejects distributions with negative or non-finite components or a sum away
    /// from 1.0. Components may exceed 1.0 by at most the sum tolerance.
    /// Never normalizes: a bad distribution points at an upstream classifier bug.
    pub fn validate(&self) -> Result<(), ScoreError> {
        for (field, value) in [
            ("negative", self.negative),
            ("neutral", self.neutral),
            ("positive", self.positive),
        ] {
            if !value.is_finite() || !(0.0..=1.0 + SCORE_SUM_TOLERANCE).contains(&value) {
                return Err(ScoreError::OutOfRange { field, value });
            }
        }

        let sum = self.negative + self.neutral + self.positive;
        if (sum - 1.0).abs() > SCORE_SUM_TOLERANCE {
            return Err(ScoreError::BadSum { sum });
        }
        Ok(())
    }

    pub fn get(&self, label: SentimentLabel) -> f64 {
        match label {
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Positive => self.positive,
        }
    }

    /// Highest-scoring label. Ties resolve to the earlier of negative, neutral, positive.
    pub fn primary_label(&self) -> SentimentLabel {
        let mut best = SentimentLabel::Negative;
        for label in [SentimentLabel::Neutral, SentimentLabel::Positive] {
            if self.get(label) > self.get(best) {
                best = label;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(negative: f64, neutral: f64, positive: f64) -> SentimentScores {
        SentimentScores {
            negative,
            neutral,
            positive,
        }
    }

    #[test]
    fn test_baseline_is_valid() {
        assert!(SentimentScores::NEUTRAL_BASELINE.validate().is_ok());
        assert_eq!(
            SentimentScores::NEUTRAL_BASELINE.primary_label(),
            SentimentLabel::Neutral
        );
    }

    #[test]
    fn test_sum_within_tolerance_accepted() {
        assert!(scores(0.2, 0.3, 0.5 + 1e-6).validate().is_ok());
    }

    #[test]
    fn test_component_just_above_one_accepted() {
        assert!(scores(1.0 + 5e-7, 0.0, 0.0).validate().is_ok());
        assert!(scores(0.0, 0.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_component_far_above_one_rejected() {
        assert!(matches!(
            scores(1.5, 0.0, 0.0).validate(),
            Err(ScoreError::OutOfRange { field: "negative", .. })
        ));
    }

    #[test]
    fn test_sum_far_from_one_rejected() {
        let err = scores(0.5, 0.5, 0.5).validate().unwrap_err();
        assert!(matches!(err, ScoreError::BadSum { .. }));
    }

    #[test]
    fn test_negative_component_rejected() {
        let err = scores(-0.1, 0.6, 0.5).validate().unwrap_err();
        assert_eq!(
            err,
            ScoreError::OutOfRange {
                field: "negative",
                value: -0.1
            }
        );
    }

    #[test]
    fn test_nan_component_rejected() {
        assert!(scores(f64::NAN, 0.5, 0.5).validate().is_err());
    }

    #[test]
    fn test_primary_label_argmax() {
        assert_eq!(
            scores(0.7, 0.2, 0.1).primary_label(),
            SentimentLabel::Negative
        );
        assert_eq!(
            scores(0.1, 0.2, 0.7).primary_label(),
            SentimentLabel::Positive
        );
    }

    #[test]
    fn test_primary_label_tie_prefers_earlier() {
        assert_eq!(
            scores(0.4, 0.4, 0.2).primary_label(),
            SentimentLabel::Negative
        );
    }

    #[test]
    fn test_label_parse_is_case_insensitive() {
        assert_eq!(
            "Positive".parse::<SentimentLabel>().unwrap(),
            SentimentLabel::Positive
        );
        assert!(matches!(
            "angry".parse::<SentimentLabel>(),
            Err(ScoreError::UnknownLabel(_))
        ));
    }

    #[test]
    fn test_label_serde_snake_case() {
        let json = serde_json::to_string(&SentimentLabel::Negative).unwrap();
        assert_eq!(json, r#""negative""#);
    }
}
