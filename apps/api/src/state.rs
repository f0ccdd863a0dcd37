use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::trend::TrendPolicy;
use crate::classifier::SentimentClassifier;
use crate::insights::cooldown::CooldownPolicy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable classifier. Default: HttpSentimentClassifier.
    pub classifier: Arc<dyn SentimentClassifier>,
    pub trend_policy: TrendPolicy,
    pub cooldowns: CooldownPolicy,
}
