mod analysis;
mod classifier;
mod config;
mod db;
mod errors;
mod insights;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::trend::TrendPolicy;
use crate::classifier::HttpSentimentClassifier;
use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::insights::cooldown::CooldownPolicy;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MindBuddy API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize sentiment classifier
    let classifier = Arc::new(HttpSentimentClassifier::new(
        config.sentiment_api_url.clone(),
        config.sentiment_api_token.clone(),
    )?);
    info!("Sentiment classifier initialized ({})", config.sentiment_api_url);

    let state = AppState {
        db,
        classifier,
        trend_policy: TrendPolicy::default(),
        cooldowns: CooldownPolicy::default(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
