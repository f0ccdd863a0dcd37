use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::keywords::KeywordScan;
use crate::analysis::models::{SentimentLabel, SentimentScores};
use crate::models::sentiment::{LabelDistributionRow, SentimentRecordRow};

/// Parameters for appending a sentiment record.
pub struct NewSentimentRecord<'a> {
    pub user_id: Uuid,
    pub journal_entry_id: Option<Uuid>,
    pub label: SentimentLabel,
    pub scores: SentimentScores,
    pub scan: &'a KeywordScan,
}

/// Appends one record to the user's sentiment log.
/// Records are never updated; erasure is the only removal path.
pub async fn insert_record(
    pool: &PgPool,
    record: NewSentimentRecord<'_>,
) -> Result<SentimentRecordRow> {
    let NewSentimentRecord {
        user_id,
        journal_entry_id,
        label,
        scores,
        scan,
    } = record;

    let row = sqlx::query_as::<_, SentimentRecordRow>(
        r#"
        INSERT INTO sentiment_records
            (id, user_id, journal_entry_id, sentiment_label, negative, neutral, positive,
             detected_emotions, crisis_flag, crisis_keywords)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(journal_entry_id)
    .bind(label.as_str())
    .bind(scores.negative)
    .bind(scores.neutral)
    .bind(scores.positive)
    .bind(&scan.emotions)
    .bind(scan.crisis_flag)
    .bind(&scan.crisis_keywords)
    .fetch_one(pool)
    .await?;

    info!(
        "Stored {} sentiment record {} for user {user_id}",
        row.sentiment_label, row.id
    );
    Ok(row)
}

/// Records for a user, newest first. `days` bounds age; `limit` bounds count.
pub async fn find_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: Option<i64>,
    days: Option<i32>,
) -> Result<Vec<SentimentRecordRow>> {
    Ok(sqlx::query_as::<_, SentimentRecordRow>(
        r#"
        SELECT * FROM sentiment_records
        WHERE user_id = $1
          AND ($2::int IS NULL OR created_at >= now() - make_interval(days => $2::int))
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(days)
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// Crisis-flagged records within the last `days` days, newest first.
pub async fn recent_crisis_flags(
    pool: &PgPool,
    user_id: Uuid,
    days: i32,
) -> Result<Vec<SentimentRecordRow>> {
    Ok(sqlx::query_as::<_, SentimentRecordRow>(
        r#"
        SELECT * FROM sentiment_records
        WHERE user_id = $1
          AND crisis_flag = TRUE
          AND created_at >= now() - make_interval(days => $2::int)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(days)
    .fetch_all(pool)
    .await?)
}

/// Count and mean positive score per label over the last `days` days.
pub async fn label_distribution(
    pool: &PgPool,
    user_id: Uuid,
    days: i32,
) -> Result<Vec<LabelDistributionRow>> {
    Ok(sqlx::query_as::<_, LabelDistributionRow>(
        r#"
        SELECT sentiment_label,
               COUNT(*) AS count,
               AVG(positive) AS avg_positive_score
        FROM sentiment_records
        WHERE user_id = $1
          AND created_at >= now() - make_interval(days => $2::int)
        GROUP BY sentiment_label
        ORDER BY sentiment_label
        "#,
    )
    .bind(user_id)
    .bind(days)
    .fetch_all(pool)
    .await?)
}

pub async fn last_record_at(pool: &PgPool, user_id: Uuid) -> Result<Option<DateTime<Utc>>> {
    Ok(
        sqlx::query_scalar("SELECT MAX(created_at) FROM sentiment_records WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?,
    )
}
