use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::models::{SentimentLabel, SentimentScores};

/// One classified observation. Append-only: never updated after insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SentimentRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub journal_entry_id: Option<Uuid>,
    #[sqlx(try_from = "String")]
    pub sentiment_label: SentimentLabel,
    #[sqlx(flatten)]
    pub sentiment_scores: SentimentScores,
    pub detected_emotions: Vec<String>,
    pub crisis_flag: bool,
    pub crisis_keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-label aggregate over a recency window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LabelDistributionRow {
    pub sentiment_label: String,
    pub count: i64,
    pub avg_positive_score: Option<f64>,
}
