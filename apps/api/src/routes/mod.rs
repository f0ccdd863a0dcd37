pub mod account;
pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::analysis::handlers as sentiment;
use crate::insights::handlers as insights;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sentiment API
        .route("/api/v1/sentiment/analyze", post(sentiment::handle_analyze))
        .route("/api/v1/sentiment/history", get(sentiment::handle_history))
        .route("/api/v1/sentiment/trends", get(sentiment::handle_trends))
        .route(
            "/api/v1/sentiment/crisis-check",
            get(sentiment::handle_crisis_check),
        )
        // Insights API
        .route("/api/v1/insights", get(insights::handle_list))
        .route("/api/v1/insights/urgent", get(insights::handle_urgent))
        .route("/api/v1/insights/daily", get(insights::handle_daily))
        .route("/api/v1/insights/check-in", get(insights::handle_check_in))
        .route("/api/v1/insights/generate", post(insights::handle_generate))
        .route("/api/v1/insights/:id/read", put(insights::handle_mark_read))
        .route("/api/v1/insights/:id/dismiss", put(insights::handle_dismiss))
        // Account erasure
        .route(
            "/api/v1/users/:id/wellness-data",
            delete(account::handle_erase_wellness_data),
        )
        .with_state(state)
}

/// Applies a default and clamps an optional query parameter into `[min, max]`.
pub fn bounded<T: Ord + Copy>(value: Option<T>, default: T, min: T, max: T) -> T {
    value.unwrap_or(default).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_defaults_and_clamps() {
        assert_eq!(bounded(None, 30, 1, 100), 30);
        assert_eq!(bounded(Some(500), 30, 1, 100), 100);
        assert_eq!(bounded(Some(0), 30, 1, 100), 1);
        assert_eq!(bounded(Some(-4), 7, 1, 30), 1);
        assert_eq!(bounded(Some(12), 7, 1, 30), 12);
    }
}
