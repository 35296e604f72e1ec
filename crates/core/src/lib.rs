#![forbid(unsafe_code)]

pub mod error;
pub mod leaderboard;
pub mod model;
pub mod time;

pub use error::Error;
pub use leaderboard::{LeaderboardEntry, ScoreAggregator};
pub use time::Clock;
