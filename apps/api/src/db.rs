use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS sentiment_records (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        journal_entry_id UUID,
        sentiment_label TEXT NOT NULL
            CHECK (sentiment_label IN ('negative', 'neutral', 'positive')),
        negative DOUBLE PRECISION NOT NULL,
        neutral DOUBLE PRECISION NOT NULL,
        positive DOUBLE PRECISION NOT NULL,
        detected_emotions TEXT[] NOT NULL DEFAULT '{}',
        crisis_flag BOOLEAN NOT NULL DEFAULT FALSE,
        crisis_keywords TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_sentiment_records_user_created \
        ON sentiment_records (user_id, created_at DESC)",
    r#"CREATE TABLE IF NOT EXISTS wellness_insights (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        insight_type TEXT NOT NULL
            CHECK (insight_type IN ('daily_tip', 'mood_pattern', 'wellness_recommendation', 'crisis_support')),
        insight_text TEXT NOT NULL,
        recommendation TEXT,
        activity_suggestion TEXT,
        priority TEXT NOT NULL DEFAULT 'normal'
            CHECK (priority IN ('low', 'normal', 'high', 'urgent')),
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        is_dismissed BOOLEAN NOT NULL DEFAULT FALSE,
        based_on_sentiment TEXT,
        based_on_pattern TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        read_at TIMESTAMPTZ
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_wellness_insights_user_created \
        ON wellness_insights (user_id, created_at DESC)",
];

/// Creates the sentiment and insight tables if they do not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}
