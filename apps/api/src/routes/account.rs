use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ErasureResponse {
    pub sentiment_records_deleted: u64,
    pub insights_deleted: u64,
}

/// DELETE /api/v1/users/:id/wellness-data
/// Account erasure: the only path that removes sentiment records or insights.
pub async fn handle_erase_wellness_data(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ErasureResponse>, AppError> {
    let mut tx = state.db.begin().await?;

    let sentiment_records_deleted = sqlx::query("DELETE FROM sentiment_records WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let insights_deleted = sqlx::query("DELETE FROM wellness_insights WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    info!(
        "Erased wellness data for user {user_id}: {sentiment_records_deleted} records, {insights_deleted} insights"
    );

    Ok(Json(ErasureResponse {
        sentiment_records_deleted,
        insights_deleted,
    }))
}
