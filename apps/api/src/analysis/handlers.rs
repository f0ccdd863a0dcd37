use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::pipeline::{analyze_and_record, AnalysisOutcome};
use crate::analysis::store::{find_by_user, label_distribution, recent_crisis_flags};
use crate::analysis::trend::{analyze_trend, RecordOrder, RiskLevel, TrendAnalysis};
use crate::errors::AppError;
use crate::insights::cooldown::should_emit;
use crate::insights::generator::{mood_pattern, MIN_PATTERN_RECORDS};
use crate::insights::models::{InsightDraft, InsightType};
use crate::insights::store::{find_recent, insert_insight};
use crate::models::insight::InsightRow;
use crate::models::sentiment::{LabelDistributionRow, SentimentRecordRow};
use crate::routes::bounded;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub user_id: Uuid,
    pub text: String,
    pub journal_entry_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub user_id: Uuid,
    pub limit: Option<i64>,
    pub days: Option<i32>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub history: Vec<SentimentRecordRow>,
    pub count: usize,
}

#[derive(Deserialize)]
pub struct TrendsQuery {
    pub user_id: Uuid,
    pub days: Option<i32>,
}

/// A mood-pattern insight either as stored or, when not persisted, as generated.
#[derive(Serialize)]
#[serde(untagged)]
pub enum PatternInsight {
    Stored(InsightRow),
    Draft(InsightDraft),
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum TrendsResponse {
    Insufficient {
        message: &'static str,
        trend: Option<TrendAnalysis>,
    },
    Analysis {
        trend_analysis: TrendAnalysis,
        sentiment_distribution: Vec<LabelDistributionRow>,
        pattern_insight: Option<PatternInsight>,
    },
}

#[derive(Deserialize)]
pub struct CrisisCheckQuery {
    pub user_id: Uuid,
    pub days: Option<i32>,
}

#[derive(Serialize)]
pub struct CrisisCheckResponse {
    pub has_crisis_flags: bool,
    pub crisis_count: usize,
    pub recent_crises: Vec<SentimentRecordRow>,
}

/// POST /api/v1/sentiment/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    require_text(&req.text)?;

    info!("Analyzing sentiment for user {}", req.user_id);
    let outcome = analyze_and_record(&state, req.user_id, &req.text, req.journal_entry_id).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/sentiment/history
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let limit = bounded(params.limit, 30, 1, 100);
    let days = bounded(params.days, 30, 1, 365);

    let history = find_by_user(&state.db, params.user_id, Some(limit), Some(days)).await?;
    Ok(Json(HistoryResponse {
        count: history.len(),
        history,
    }))
}

/// GET /api/v1/sentiment/trends
pub async fn handle_trends(
    State(state): State<AppState>,
    Query(params): Query<TrendsQuery>,
) -> Result<Json<TrendsResponse>, AppError> {
    let days = bounded(params.days, 30, 1, 365);
    info!("Analyzing sentiment trends for user {}", params.user_id);

    let records = find_by_user(&state.db, params.user_id, None, Some(days)).await?;
    if records.len() < MIN_PATTERN_RECORDS {
        return Ok(Json(TrendsResponse::Insufficient {
            message: "Not enough data for trend analysis",
            trend: None,
        }));
    }

    let trend_analysis = analyze_trend(&records, RecordOrder::NewestFirst, &state.trend_policy)
        .map_err(anyhow::Error::from)?;
    let sentiment_distribution = label_distribution(&state.db, params.user_id, days).await?;

    let draft = {
        let mut rng = rand::thread_rng();
        mood_pattern(&trend_analysis, &mut rng)
    };

    let pattern_insight = match draft {
        Some(draft) if trend_analysis.risk_level != RiskLevel::Low => {
            let existing = find_recent(&state.db, params.user_id).await?;
            if should_emit(
                &existing,
                InsightType::MoodPattern,
                chrono::Utc::now(),
                &state.cooldowns,
            ) {
                let row = insert_insight(&state.db, params.user_id, &draft).await?;
                Some(PatternInsight::Stored(row))
            } else {
                Some(PatternInsight::Draft(draft))
            }
        }
        Some(draft) => Some(PatternInsight::Draft(draft)),
        None => None,
    };

    Ok(Json(TrendsResponse::Analysis {
        trend_analysis,
        sentiment_distribution,
        pattern_insight,
    }))
}

/// GET /api/v1/sentiment/crisis-check
pub async fn handle_crisis_check(
    State(state): State<AppState>,
    Query(params): Query<CrisisCheckQuery>,
) -> Result<Json<CrisisCheckResponse>, AppError> {
    let days = bounded(params.days, 7, 1, 30);

    let recent_crises = recent_crisis_flags(&state.db, params.user_id, days).await?;
    Ok(Json(CrisisCheckResponse {
        has_crisis_flags: !recent_crises.is_empty(),
        crisis_count: recent_crises.len(),
        recent_crises,
    }))
}

/// Only missing or empty text is rejected. Whitespace-only text is classified
/// as the neutral baseline downstream.
fn require_text(text: &str) -> Result<(), AppError> {
    if text.is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_rejected() {
        assert!(matches!(require_text(""), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_whitespace_text_accepted() {
        assert!(require_text("   \n").is_ok());
        assert!(require_text("ok").is_ok());
    }
}
