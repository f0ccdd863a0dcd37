use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::insights::models::{InsightType, Priority};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InsightRow {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub insight_type: InsightType,
    pub insight_text: String,
    pub recommendation: Option<String>,
    pub activity_suggestion: Option<String>,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub is_read: bool,
    pub is_dismissed: bool,
    pub based_on_sentiment: Option<String>,
    pub based_on_pattern: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}
