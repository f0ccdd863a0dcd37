//! Submission flow: scan + classify, append the record, then emit at most one
//! follow-up insight (crisis support, or a wellness recommendation on a negative
//! record) subject to the cooldown gate.

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::keywords::detect_crisis_and_emotions;
use crate::analysis::models::{ScoreError, SentimentLabel};
use crate::analysis::store::{insert_record, NewSentimentRecord};
use crate::classifier::classify_text;
use crate::errors::AppError;
use crate::insights::cooldown::should_emit;
use crate::insights::generator::{crisis_support, wellness_recommendation};
use crate::insights::models::{InsightDraft, InsightType};
use crate::insights::store::{find_recent, insert_insight};
use crate::models::insight::InsightRow;
use crate::models::sentiment::SentimentRecordRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalysisOutcome {
    pub sentiment: SentimentRecordRow,
    pub insights: Vec<InsightRow>,
}

/// The insight type a freshly stored record calls for, before the cooldown gate.
pub fn follow_up_type(record: &SentimentRecordRow) -> Option<InsightType> {
    if record.crisis_flag {
        Some(InsightType::CrisisSupport)
    } else if record.sentiment_label == SentimentLabel::Negative {
        Some(InsightType::WellnessRecommendation)
    } else {
        None
    }
}

pub fn draft_follow_up<R: Rng + ?Sized>(
    record: &SentimentRecordRow,
    insight_type: InsightType,
    rng: &mut R,
) -> Result<Option<InsightDraft>, ScoreError> {
    match insight_type {
        InsightType::CrisisSupport => Ok(Some(crisis_support(&record.crisis_keywords))),
        InsightType::WellnessRecommendation => {
            let score = record.sentiment_scores.get(record.sentiment_label);
            wellness_recommendation(record.sentiment_label, Some(score), rng).map(Some)
        }
        InsightType::DailyTip | InsightType::MoodPattern => Ok(None),
    }
}

pub async fn analyze_and_record(
    state: &AppState,
    user_id: Uuid,
    text: &str,
    journal_entry_id: Option<Uuid>,
) -> Result<AnalysisOutcome, AppError> {
    let scan = detect_crisis_and_emotions(text);
    let classification = classify_text(state.classifier.as_ref(), text).await?;

    let record = insert_record(
        &state.db,
        NewSentimentRecord {
            user_id,
            journal_entry_id,
            label: classification.label,
            scores: classification.scores,
            scan: &scan,
        },
    )
    .await?;

    let mut insights = Vec::new();

    if let Some(insight_type) = follow_up_type(&record) {
        if record.crisis_flag {
            warn!(
                "Crisis keywords detected for user {user_id} (record {})",
                record.id
            );
        }

        let existing = find_recent(&state.db, user_id).await?;
        if should_emit(&existing, insight_type, Utc::now(), &state.cooldowns) {
            let draft = {
                let mut rng = rand::thread_rng();
                draft_follow_up(&record, insight_type, &mut rng).map_err(anyhow::Error::from)?
            };
            if let Some(draft) = draft {
                insights.push(insert_insight(&state.db, user_id, &draft).await?);
            }
        } else {
            info!("Skipping {insight_type} for user {user_id}: cooldown active");
        }
    }

    Ok(AnalysisOutcome {
        sentiment: record,
        insights,
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::analysis::models::SentimentLabel::{Negative as N, Neutral as U, Positive as P};
    use crate::analysis::trend::tests::window;
    use crate::insights::models::{Activity, Priority};

    #[test]
    fn test_positive_and_neutral_records_need_no_follow_up() {
        for record in window(&[P, U]) {
            assert_eq!(follow_up_type(&record), None);
        }
    }

    #[test]
    fn test_negative_record_gets_wellness_recommendation() {
        let records = window(&[N]);
        let record = &records[0];
        assert_eq!(
            follow_up_type(record),
            Some(InsightType::WellnessRecommendation)
        );

        let draft = draft_follow_up(
            record,
            InsightType::WellnessRecommendation,
            &mut StepRng::new(0, 0),
        )
        .unwrap()
        .unwrap();
        assert_eq!(draft.based_on_sentiment, Some(SentimentLabel::Negative));
        assert_eq!(draft.priority, Priority::Normal);
    }

    #[test]
    fn test_crisis_takes_precedence_over_label() {
        let mut record = window(&[P]).remove(0);
        record.crisis_flag = true;
        record.crisis_keywords = vec!["want to die".to_string()];
        assert_eq!(follow_up_type(&record), Some(InsightType::CrisisSupport));

        let draft =
            draft_follow_up(&record, InsightType::CrisisSupport, &mut StepRng::new(0, 0))
                .unwrap()
                .unwrap();
        assert_eq!(draft.priority, Priority::Urgent);
        assert_eq!(draft.activity_suggestion, Some(Activity::CrisisSupport));
        assert_eq!(
            draft.based_on_pattern.as_deref(),
            Some("Crisis keywords detected: want to die")
        );
    }

    #[test]
    fn test_strong_negative_score_escalates_priority() {
        let mut record = window(&[N]).remove(0);
        record.sentiment_scores.negative = 0.9;
        record.sentiment_scores.neutral = 0.05;
        record.sentiment_scores.positive = 0.05;
        let draft = draft_follow_up(
            &record,
            InsightType::WellnessRecommendation,
            &mut StepRng::new(0, 0),
        )
        .unwrap()
        .unwrap();
        assert_eq!(draft.priority, Priority::High);
    }
}
