/// Sentiment analysis: keyword scanning, score models, the append-only record
/// store and trend/risk aggregation over a user's recent records.
pub mod handlers;
pub mod keywords;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod trend;
