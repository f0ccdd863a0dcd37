use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::insights::models::InsightDraft;
use crate::models::insight::InsightRow;

/// How far back the cooldown gate looks. Dismissed insights still count.
pub const RECENT_INSIGHTS_LIMIT: i64 = 50;

/// Persists a generated insight and returns the stored row.
pub async fn insert_insight(
    pool: &PgPool,
    user_id: Uuid,
    draft: &InsightDraft,
) -> Result<InsightRow> {
    let row = sqlx::query_as::<_, InsightRow>(
        r#"
        INSERT INTO wellness_insights
            (id, user_id, insight_type, insight_text, recommendation,
             activity_suggestion, priority, based_on_sentiment, based_on_pattern)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(draft.insight_type.as_str())
    .bind(&draft.insight_text)
    .bind(draft.recommendation.as_deref())
    .bind(draft.activity_suggestion.map(|a| a.as_str()))
    .bind(draft.priority.as_str())
    .bind(draft.based_on_sentiment.map(|l| l.as_str()))
    .bind(draft.based_on_pattern.as_deref())
    .fetch_one(pool)
    .await?;

    info!(
        "Stored {} insight {} for user {user_id}",
        row.insight_type, row.id
    );
    Ok(row)
}

/// Non-dismissed insights for a user, newest first.
pub async fn find_by_user(
    pool: &PgPool,
    user_id: Uuid,
    unread_only: bool,
    limit: i64,
) -> Result<Vec<InsightRow>> {
    Ok(sqlx::query_as::<_, InsightRow>(
        r#"
        SELECT * FROM wellness_insights
        WHERE user_id = $1
          AND is_dismissed = FALSE
          AND ($2 = FALSE OR is_read = FALSE)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(unread_only)
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// Latest insights regardless of read or dismissed state, for the cooldown gate.
pub async fn find_recent(pool: &PgPool, user_id: Uuid) -> Result<Vec<InsightRow>> {
    Ok(sqlx::query_as::<_, InsightRow>(
        r#"
        SELECT * FROM wellness_insights
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(RECENT_INSIGHTS_LIMIT)
    .fetch_all(pool)
    .await?)
}

pub async fn find_by_id(pool: &PgPool, insight_id: Uuid) -> Result<Option<InsightRow>> {
    Ok(
        sqlx::query_as::<_, InsightRow>("SELECT * FROM wellness_insights WHERE id = $1")
            .bind(insight_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Unread, non-dismissed insights at `high` or `urgent` priority.
pub async fn find_urgent(pool: &PgPool, user_id: Uuid) -> Result<Vec<InsightRow>> {
    Ok(sqlx::query_as::<_, InsightRow>(
        r#"
        SELECT * FROM wellness_insights
        WHERE user_id = $1
          AND priority IN ('high', 'urgent')
          AND is_read = FALSE
          AND is_dismissed = FALSE
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// The daily tip created since UTC midnight, if any.
pub async fn find_todays_daily_tip(pool: &PgPool, user_id: Uuid) -> Result<Option<InsightRow>> {
    Ok(sqlx::query_as::<_, InsightRow>(
        r#"
        SELECT * FROM wellness_insights
        WHERE user_id = $1
          AND insight_type = 'daily_tip'
          AND created_at >= date_trunc('day', now() AT TIME ZONE 'UTC') AT TIME ZONE 'UTC'
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

/// `None` when the insight no longer exists.
pub async fn mark_read(pool: &PgPool, insight_id: Uuid) -> Result<Option<InsightRow>> {
    Ok(sqlx::query_as::<_, InsightRow>(
        r#"
        UPDATE wellness_insights
        SET is_read = TRUE, read_at = now(), updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(insight_id)
    .fetch_optional(pool)
    .await?)
}

pub async fn dismiss(pool: &PgPool, insight_id: Uuid) -> Result<Option<InsightRow>> {
    Ok(sqlx::query_as::<_, InsightRow>(
        r#"
        UPDATE wellness_insights
        SET is_dismissed = TRUE, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(insight_id)
    .fetch_optional(pool)
    .await?)
}
