use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::{StudentId, WordId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("attempt count must be at least 1")]
    ZeroAttemptCount,
}

//
// ─── ACTIVITY KIND ─────────────────────────────────────────────────────────────
//

/// The four vocabulary drills a student can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Spelling,
    BubblePop,
    Matching,
    PictureQuiz,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::Spelling,
        ActivityKind::BubblePop,
        ActivityKind::Matching,
        ActivityKind::PictureQuiz,
    ];

    /// Tag stored in the `activity_type` column of results.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Spelling => "spelling",
            ActivityKind::BubblePop => "bubble_pop",
            ActivityKind::Matching => "matching",
            ActivityKind::PictureQuiz => "picture_quiz",
        }
    }

    /// Parse a persisted activity tag.
    ///
    /// `matching_game` is accepted as an alias of `matching`; older rows were written with it.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "spelling" => Some(Self::Spelling),
            "bubble_pop" => Some(Self::BubblePop),
            "matching" | "matching_game" => Some(Self::Matching),
            "picture_quiz" => Some(Self::PictureQuiz),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── ATTEMPT RESULT ────────────────────────────────────────────────────────────
//

/// Outcome of one resolved attempt on one vocabulary item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptResult {
    item_id: WordId,
    kind: ActivityKind,
    is_correct: bool,
    attempt_count: u32,
    timestamp: DateTime<Utc>,
}

impl AttemptResult {
    /// # Errors
    ///
    /// Returns `AttemptError::ZeroAttemptCount` if `attempt_count` is zero.
    pub fn new(
        item_id: WordId,
        kind: ActivityKind,
        is_correct: bool,
        attempt_count: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        if attempt_count == 0 {
            return Err(AttemptError::ZeroAttemptCount);
        }
        Ok(Self {
            item_id,
            kind,
            is_correct,
            attempt_count,
            timestamp,
        })
    }

    #[must_use]
    pub fn item_id(&self) -> WordId {
        self.item_id
    }

    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A persisted result attributed to a student, as consumed by the leaderboard.
///
/// The activity tag stays raw so that rows written by unknown activities still count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAttempt {
    pub student_id: StudentId,
    pub activity_type: String,
    pub is_correct: bool,
}

impl StudentAttempt {
    #[must_use]
    pub fn new(student_id: StudentId, activity_type: impl Into<String>, is_correct: bool) -> Self {
        Self {
            student_id,
            activity_type: activity_type.into(),
            is_correct,
        }
    }

    #[must_use]
    pub fn from_result(student_id: StudentId, result: &AttemptResult) -> Self {
        Self::new(student_id, result.kind().as_str(), result.is_correct())
    }
}
