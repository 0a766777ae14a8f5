pub mod aggregator;
pub mod formatter;

pub use aggregator::{ExportRecord, LeaderboardEntry};
