use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::SentimentLabel;
use crate::analysis::store::{find_by_user as find_records, last_record_at};
use crate::analysis::trend::{analyze_trend, RecordOrder};
use crate::errors::AppError;
use crate::insights::cooldown::should_emit;
use crate::insights::generator::{check_in, daily_tip, mood_pattern, wellness_recommendation};
use crate::insights::models::{InsightDraft, InsightType};
use crate::insights::store::{
    dismiss, find_by_id, find_by_user, find_recent, find_todays_daily_tip, find_urgent,
    insert_insight, mark_read,
};
use crate::models::insight::InsightRow;
use crate::routes::bounded;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
    pub limit: Option<i64>,
    pub unread_only: Option<bool>,
}

#[derive(Serialize)]
pub struct InsightListResponse {
    pub insights: Vec<InsightRow>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct UrgentResponse {
    pub urgent_insights: Vec<InsightRow>,
    pub count: usize,
    pub has_urgent: bool,
}

#[derive(Serialize)]
pub struct DailyResponse {
    pub insight: InsightRow,
    pub is_new: bool,
}

#[derive(Serialize)]
pub struct CheckInResponse {
    pub insight: InsightDraft,
    pub days_since_last_entry: Option<i64>,
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub insight_type: Option<String>,
}

#[derive(Deserialize)]
pub struct OwnerBody {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct InsightActionResponse {
    pub message: &'static str,
    pub insight: InsightRow,
}

/// Window used to personalise and generate on-demand insights.
const ON_DEMAND_DAYS: i32 = 7;
const DAILY_TIP_RECORDS: i64 = 5;
const GENERATE_RECORDS: i64 = 10;

/// GET /api/v1/insights
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<InsightListResponse>, AppError> {
    let limit = bounded(params.limit, 10, 1, 50);
    let unread_only = params.unread_only.unwrap_or(false);

    let insights = find_by_user(&state.db, params.user_id, unread_only, limit).await?;
    Ok(Json(InsightListResponse {
        count: insights.len(),
        insights,
    }))
}

/// GET /api/v1/insights/urgent
pub async fn handle_urgent(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<UrgentResponse>, AppError> {
    let urgent_insights = find_urgent(&state.db, params.user_id).await?;
    Ok(Json(UrgentResponse {
        count: urgent_insights.len(),
        has_urgent: !urgent_insights.is_empty(),
        urgent_insights,
    }))
}

/// GET /api/v1/insights/daily
pub async fn handle_daily(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DailyResponse>, AppError> {
    if let Some(insight) = find_todays_daily_tip(&state.db, params.user_id).await? {
        return Ok(Json(DailyResponse {
            insight,
            is_new: false,
        }));
    }

    let recent = find_records(
        &state.db,
        params.user_id,
        Some(DAILY_TIP_RECORDS),
        Some(ON_DEMAND_DAYS),
    )
    .await?;
    let recent_label = recent.first().map(|r| r.sentiment_label);

    let draft = {
        let mut rng = rand::thread_rng();
        daily_tip(recent_label, &mut rng)
    };
    let insight = insert_insight(&state.db, params.user_id, &draft).await?;

    Ok(Json(DailyResponse {
        insight,
        is_new: true,
    }))
}

/// GET /api/v1/insights/check-in
pub async fn handle_check_in(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<CheckInResponse>, AppError> {
    let last = last_record_at(&state.db, params.user_id).await?;
    let days_since_last_entry = last.map(|at| days_since(at, Utc::now()));

    Ok(Json(CheckInResponse {
        insight: check_in(days_since_last_entry),
        days_since_last_entry,
    }))
}

/// POST /api/v1/insights/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<InsightActionResponse>), AppError> {
    let insight_type = generate_type(req.insight_type.as_deref())?;
    info!("Generating {insight_type} insight for user {}", req.user_id);

    let existing = find_recent(&state.db, req.user_id).await?;
    if !should_emit(&existing, insight_type, Utc::now(), &state.cooldowns) {
        return Err(AppError::UnprocessableEntity(format!(
            "A {insight_type} insight was generated recently; try again later"
        )));
    }

    let records = find_records(
        &state.db,
        req.user_id,
        Some(GENERATE_RECORDS),
        Some(ON_DEMAND_DAYS),
    )
    .await?;

    let draft = {
        let mut rng = rand::thread_rng();
        match insight_type {
            InsightType::MoodPattern => {
                let trend = analyze_trend(&records, RecordOrder::NewestFirst, &state.trend_policy)
                    .map_err(anyhow::Error::from)?;
                mood_pattern(&trend, &mut rng)
            }
            _ => {
                let (label, score) = match records.first() {
                    Some(r) => (r.sentiment_label, Some(r.sentiment_scores.get(r.sentiment_label))),
                    None => (SentimentLabel::Neutral, None),
                };
                Some(wellness_recommendation(label, score, &mut rng).map_err(anyhow::Error::from)?)
            }
        }
    };

    let draft = draft.ok_or_else(|| {
        AppError::Validation("Unable to generate insight with current data".to_string())
    })?;
    let insight = insert_insight(&state.db, req.user_id, &draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(InsightActionResponse {
            message: "Insight generated successfully",
            insight,
        }),
    ))
}

/// PUT /api/v1/insights/:id/read
pub async fn handle_mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OwnerBody>,
) -> Result<Json<InsightActionResponse>, AppError> {
    let existing = find_by_id(&state.db, id).await?;
    ensure_owner(existing.as_ref(), id, req.user_id)?;

    let insight = require_found(mark_read(&state.db, id).await?, id)?;
    Ok(Json(InsightActionResponse {
        message: "Insight marked as read",
        insight,
    }))
}

/// PUT /api/v1/insights/:id/dismiss
pub async fn handle_dismiss(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OwnerBody>,
) -> Result<Json<InsightActionResponse>, AppError> {
    let existing = find_by_id(&state.db, id).await?;
    ensure_owner(existing.as_ref(), id, req.user_id)?;

    let insight = require_found(dismiss(&state.db, id).await?, id)?;
    Ok(Json(InsightActionResponse {
        message: "Insight dismissed",
        insight,
    }))
}

/// Only mood patterns and wellness recommendations can be requested on demand.
/// A missing type means a wellness recommendation.
fn generate_type(raw: Option<&str>) -> Result<InsightType, AppError> {
    let insight_type = match raw {
        None => InsightType::WellnessRecommendation,
        Some(s) => s
            .parse::<InsightType>()
            .map_err(|e| AppError::Validation(e.to_string()))?,
    };
    match insight_type {
        InsightType::MoodPattern | InsightType::WellnessRecommendation => Ok(insight_type),
        other => Err(AppError::Validation(format!(
            "Insight type '{other}' cannot be generated on demand"
        ))),
    }
}

/// The row can vanish between the ownership check and the update (account erasure).
fn require_found(row: Option<InsightRow>, id: Uuid) -> Result<InsightRow, AppError> {
    row.ok_or_else(|| AppError::NotFound(format!("Insight {id} not found")))
}

fn ensure_owner(row: Option<&InsightRow>, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    match row {
        None => Err(AppError::NotFound(format!("Insight {id} not found"))),
        Some(row) if row.user_id != user_id => Err(AppError::Forbidden),
        Some(_) => Ok(()),
    }
}

/// Whole days elapsed, never negative.
fn days_since(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - at).num_days().max(0)
}
