/// Wellness insights: static content, the generator, the per-type cooldown gate
/// and the insight store. Generation is pure; only `store` and `handlers` touch I/O.
pub mod content;
pub mod cooldown;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod store;
