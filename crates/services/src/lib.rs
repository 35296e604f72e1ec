#![forbid(unsafe_code)]

pub mod activity;
pub mod config;
pub mod error;
pub mod launcher;
pub mod leaderboard;
pub mod recorder;

pub use vocab_core::Clock;

pub use activity::{
    ActivityRunner, Advance, AttemptListener, AttemptOutcome, BubblePopDrill, MatchingDrill,
    PictureQuizDrill, Progress, RunnerState, SessionSummary, SpellingDrill, SpellingLevel,
};
pub use config::{load_settings_env, load_settings_json};
pub use error::{ActivityError, ConfigError, LaunchError, LeaderboardError, PersistenceFailure};
pub use launcher::ActivityLauncher;
pub use leaderboard::LeaderboardService;
pub use recorder::ResultRecorder;
