//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use vocab_core::model::{AttemptError, ClassId, SettingsError, StudentId, WordId};

use crate::activity::RunnerState;

/// Errors emitted by `ActivityRunner` and the drills built on it.
///
/// A wrong answer is never an error; it is an `AttemptResult` with `is_correct == false`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ActivityError {
    #[error("no vocabulary items to run the activity on")]
    EmptyInput,
    #[error("cannot {operation} while the activity is {state}")]
    InvalidState {
        operation: &'static str,
        state: RunnerState,
    },
    #[error("vocabulary item {0} appears more than once")]
    DuplicateItem(WordId),
    #[error("need at least {required} words with pictures, found {available}")]
    NotEnoughItems { required: usize, available: usize },
    #[error("selection {index} is not available")]
    InvalidSelection { index: usize },
    #[error("answer is incomplete: {given} of {expected} letters placed")]
    IncompleteAnswer { expected: usize, given: usize },
    #[error(transparent)]
    Attempt(#[from] AttemptError),
}

/// A result could not be persisted. Never fatal to the running activity.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceFailure {
    #[error("student {student_id} is not enrolled in class {class_id}")]
    NotEnrolled {
        student_id: StudentId,
        class_id: ClassId,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LeaderboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LeaderboardError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while launching an activity from a stored list.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LaunchError {
    #[error(transparent)]
    Activity(#[from] ActivityError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while loading settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] SettingsError),
}
