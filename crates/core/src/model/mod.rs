mod activity;
mod ids;
mod settings;
mod student;
mod vocabulary;

pub use activity::{ActivityKind, AttemptError, AttemptResult, StudentAttempt};
pub use ids::{ClassId, ListId, ParseIdError, SessionId, StudentId, WordId};
pub use settings::{
    DrillSettings, PointWeights, RankingPolicy, Settings, SettingsDraft, SettingsError,
};
pub use student::StudentIdentity;
pub use vocabulary::{ImageRef, VocabularyItem, VocabularyItemError};
