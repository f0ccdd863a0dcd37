pub mod insight;
pub mod sentiment;
