use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::models::SentimentLabel;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsightError {
    #[error("Unknown insight type '{0}'")]
    UnknownType(String),

    #[error("Unknown insight priority '{0}'")]
    UnknownPriority(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    DailyTip,
    MoodPattern,
    WellnessRecommendation,
    CrisisSupport,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::DailyTip => "daily_tip",
            InsightType::MoodPattern => "mood_pattern",
            InsightType::WellnessRecommendation => "wellness_recommendation",
            InsightType::CrisisSupport => "crisis_support",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily_tip" => Ok(InsightType::DailyTip),
            "mood_pattern" => Ok(InsightType::MoodPattern),
            "wellness_recommendation" => Ok(InsightType::WellnessRecommendation),
            "crisis_support" => Ok(InsightType::CrisisSupport),
            _ => Err(InsightError::UnknownType(s.to_string())),
        }
    }
}

impl TryFrom<String> for InsightType {
    type Error = InsightError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(InsightError::UnknownPriority(s.to_string())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = InsightError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Suggested activity tag attached to an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Breathing,
    Meditation,
    Journaling,
    Exercise,
    Gratitude,
    Social,
    CrisisSupport,
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Breathing => "breathing",
            Activity::Meditation => "meditation",
            Activity::Journaling => "journaling",
            Activity::Exercise => "exercise",
            Activity::Gratitude => "gratitude",
            Activity::Social => "social",
            Activity::CrisisSupport => "crisis_support",
        }
    }
}

/// A generated insight that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightDraft {
    pub insight_type: InsightType,
    pub insight_text: String,
    pub recommendation: Option<String>,
    pub activity_suggestion: Option<Activity>,
    pub priority: Priority,
    pub based_on_sentiment: Option<SentimentLabel>,
    pub based_on_pattern: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_type_round_trips_through_str() {
        for t in [
            InsightType::DailyTip,
            InsightType::MoodPattern,
            InsightType::WellnessRecommendation,
            InsightType::CrisisSupport,
        ] {
            assert_eq!(t.as_str().parse::<InsightType>().unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_insight_type_rejected() {
        assert_eq!(
            "weekly_digest".parse::<InsightType>(),
            Err(InsightError::UnknownType("weekly_digest".to_string()))
        );
    }

    #[test]
    fn test_insight_type_deserializes_from_request_body() {
        let t: InsightType = serde_json::from_str(r#""wellness_recommendation""#).unwrap();
        assert_eq!(t, InsightType::WellnessRecommendation);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Normal);
        assert!(Priority::Normal > Priority::Low);
    }

    #[test]
    fn test_activity_serializes_snake_case() {
        let json = serde_json::to_string(&Activity::CrisisSupport).unwrap();
        assert_eq!(json, r#""crisis_support""#);
    }
}
