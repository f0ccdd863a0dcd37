//! Insight Generator: turns sentiment and trend signals into concrete insights.
//!
//! Every entry point is pure given its inputs. Random selections draw from the
//! caller's `Rng`, so tests can pass a fixed source and assert the exact pick.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::analysis::models::{ScoreError, SentimentLabel};
use crate::analysis::trend::TrendAnalysis;
use crate::insights::content::{
    activity_detail, level_guidance, trend_guidance, WellnessLevel, CHECK_IN_RECOMMENDATION,
    CRISIS_MESSAGE, CRISIS_PROVENANCE_KEYWORDS, CRISIS_RESOURCES, DAILY_TIPS, NEGATIVE_TIP_PREFIX,
    NEGATIVE_TIP_SUFFIX, POSITIVE_TIP_PREFIX, POSITIVE_TIP_SUFFIX, WELCOME_BACK_MESSAGE,
};
use crate::insights::models::{Activity, InsightDraft, InsightType, Priority};

/// Mood patterns need at least this many records in the window.
pub const MIN_PATTERN_RECORDS: usize = 2;

/// Scores strictly above this on a negative label escalate to `NegativeHigh`.
pub const HIGH_INTENSITY_SCORE: f64 = 0.8;

/// Daily tip, framed by the user's most recent sentiment when one is known.
pub fn daily_tip<R: Rng + ?Sized>(recent: Option<SentimentLabel>, rng: &mut R) -> InsightDraft {
    let tip = pick(DAILY_TIPS, rng);

    let insight_text = match recent {
        Some(SentimentLabel::Negative) => {
            format!("{NEGATIVE_TIP_PREFIX}{tip}{NEGATIVE_TIP_SUFFIX}")
        }
        Some(SentimentLabel::Positive) => {
            format!("{POSITIVE_TIP_PREFIX}{tip}{POSITIVE_TIP_SUFFIX}")
        }
        Some(SentimentLabel::Neutral) | None => tip.to_string(),
    };

    InsightDraft {
        insight_type: InsightType::DailyTip,
        insight_text,
        recommendation: None,
        activity_suggestion: None,
        priority: Priority::Normal,
        based_on_sentiment: None,
        based_on_pattern: None,
    }
}

/// Mood pattern insight for an analyzed window.
/// Returns `None` when the window holds fewer than `MIN_PATTERN_RECORDS` records.
pub fn mood_pattern<R: Rng + ?Sized>(trend: &TrendAnalysis, rng: &mut R) -> Option<InsightDraft> {
    if trend.total_entries < MIN_PATTERN_RECORDS {
        return None;
    }

    let guidance = trend_guidance(trend.trend);

    Some(InsightDraft {
        insight_type: InsightType::MoodPattern,
        insight_text: pick(guidance.messages, rng).to_string(),
        recommendation: Some(guidance.recommendation.to_string()),
        activity_suggestion: guidance.activity,
        priority: guidance.priority,
        based_on_sentiment: None,
        based_on_pattern: Some(format!(
            "{} trend over {} entries",
            trend.trend, trend.total_entries
        )),
    })
}

/// Buckets a label and optional confidence score into a wellness level.
pub fn wellness_level(label: SentimentLabel, score: Option<f64>) -> WellnessLevel {
    match label {
        SentimentLabel::Negative => match score {
            Some(s) if s > HIGH_INTENSITY_SCORE => WellnessLevel::NegativeHigh,
            _ => WellnessLevel::NegativeMedium,
        },
        SentimentLabel::Neutral => WellnessLevel::Neutral,
        SentimentLabel::Positive => WellnessLevel::Positive,
    }
}

/// Activity recommendation for the current sentiment.
///
/// `score` is the classifier's confidence for `label`; values outside [0, 1] are
/// rejected rather than clamped.
pub fn wellness_recommendation<R: Rng + ?Sized>(
    label: SentimentLabel,
    score: Option<f64>,
    rng: &mut R,
) -> Result<InsightDraft, ScoreError> {
    if let Some(value) = score {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ScoreError::OutOfRange {
                field: "score",
                value,
            });
        }
    }

    let level = wellness_level(label, score);
    let guidance = level_guidance(level);
    let activity = pick(guidance.activities, rng);

    let priority = if level == WellnessLevel::NegativeHigh {
        Priority::High
    } else {
        Priority::Normal
    };

    Ok(InsightDraft {
        insight_type: InsightType::WellnessRecommendation,
        insight_text: guidance.message.to_string(),
        recommendation: Some(activity_detail(activity).to_string()),
        activity_suggestion: Some(activity),
        priority,
        based_on_sentiment: Some(label),
        based_on_pattern: None,
    })
}

/// Urgent support message. Content is fixed; only provenance reflects the keywords.
pub fn crisis_support(crisis_keywords: &[String]) -> InsightDraft {
    let matched = crisis_keywords
        .iter()
        .take(CRISIS_PROVENANCE_KEYWORDS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    InsightDraft {
        insight_type: InsightType::CrisisSupport,
        insight_text: CRISIS_MESSAGE.to_string(),
        recommendation: Some(CRISIS_RESOURCES.to_string()),
        activity_suggestion: Some(Activity::CrisisSupport),
        priority: Priority::Urgent,
        based_on_sentiment: None,
        based_on_pattern: Some(format!("Crisis keywords detected: {matched}")),
    }
}

/// Check-in nudge scaled by how long the user has been away.
/// `None` (no activity on record) gets the welcome message.
pub fn check_in(days_since_last_entry: Option<i64>) -> InsightDraft {
    let (insight_text, priority) = match days_since_last_entry {
        Some(days) if days >= 7 => (
            format!(
                "We haven't seen you in {days} days. \
                Your mental wellness journey matters, and we're here for you. \
                Even small steps count - how about a quick check-in today?"
            ),
            Priority::High,
        ),
        Some(days) if days >= 3 => (
            format!(
                "It's been {days} days since your last visit. \
                How are you feeling? Taking a moment to check in with yourself can be valuable."
            ),
            Priority::Normal,
        ),
        _ => (WELCOME_BACK_MESSAGE.to_string(), Priority::Low),
    };

    InsightDraft {
        insight_type: InsightType::DailyTip,
        insight_text,
        recommendation: Some(CHECK_IN_RECOMMENDATION.to_string()),
        activity_suggestion: Some(Activity::Journaling),
        priority,
        based_on_sentiment: None,
        based_on_pattern: None,
    }
}

/// Uniform pick from a static content table.
fn pick<T: Copy, R: Rng + ?Sized>(table: &[T], rng: &mut R) -> T {
    *table
        .choose(rng)
        .expect("content tables are non-empty static data")
}
