use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::activity::ActivityKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("picture quiz needs at least 2 choices per question")]
    InvalidChoiceCount,

    #[error("picture quiz minimum items ({min_items}) must be >= choices ({choices})")]
    InvalidMinItems { min_items: usize, choices: usize },

    #[error("bubble pop needs room for at least one bubble")]
    InvalidBubbleCount,

    #[error("matching needs 1 <= minimum items ({min_items}) <= maximum items ({max_items})")]
    InvalidMatchingRange { min_items: usize, max_items: usize },
}

//
// ─── POINT WEIGHTS ─────────────────────────────────────────────────────────────
//

/// Points awarded per correct attempt, keyed by activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointWeights {
    pub spelling: u32,
    pub bubble_pop: u32,
    pub picture_quiz: u32,
    pub matching: u32,
    /// Used for activity tags that are not recognized.
    pub default: u32,
}

impl Default for PointWeights {
    fn default() -> Self {
        Self {
            spelling: 10,
            bubble_pop: 8,
            picture_quiz: 7,
            matching: 5,
            default: 5,
        }
    }
}

impl PointWeights {
    #[must_use]
    pub fn for_kind(&self, kind: ActivityKind) -> u32 {
        match kind {
            ActivityKind::Spelling => self.spelling,
            ActivityKind::BubblePop => self.bubble_pop,
            ActivityKind::PictureQuiz => self.picture_quiz,
            ActivityKind::Matching => self.matching,
        }
    }

    /// Points for a raw persisted activity tag.
    #[must_use]
    pub fn points_for(&self, tag: &str) -> u32 {
        ActivityKind::from_tag(tag).map_or(self.default, |kind| self.for_kind(kind))
    }
}

//
// ─── RANKING ───────────────────────────────────────────────────────────────────
//

/// How ranks are numbered once the leaderboard is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Rank is the 1-based position in the sorted leaderboard (1, 2, 3).
    #[default]
    Positional,
    /// Equal scores share a rank and the next score skips ahead (1, 1, 3).
    SharedTies,
}

//
// ─── DRILL SETTINGS ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillSettings {
    /// Words with pictures required before a picture quiz can start.
    pub picture_quiz_min_items: usize,
    /// Options shown per picture, including the correct one.
    pub picture_quiz_choices: usize,
    pub bubble_pop_max_bubbles: usize,
    pub bubble_pop_max_distractors: usize,
    /// Words with pictures required before a matching game can start.
    pub matching_min_items: usize,
    /// Words beyond this many are left out of a matching game.
    pub matching_max_items: usize,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            picture_quiz_min_items: 4,
            picture_quiz_choices: 4,
            bubble_pop_max_bubbles: 20,
            bubble_pop_max_distractors: 15,
            matching_min_items: 3,
            matching_max_items: 8,
        }
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Validated configuration for scoring and drills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Settings {
    weights: PointWeights,
    ranking: RankingPolicy,
    drills: DrillSettings,
}

/// Unvalidated settings as read from configuration input.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct SettingsDraft {
    pub weights: PointWeights,
    pub ranking: RankingPolicy,
    pub drills: DrillSettings,
}

impl SettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft into usable settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if drill sizes are inconsistent.
    pub fn validate(self) -> Result<Settings, SettingsError> {
        let drills = self.drills;
        if drills.picture_quiz_choices < 2 {
            return Err(SettingsError::InvalidChoiceCount);
        }
        if drills.picture_quiz_min_items < drills.picture_quiz_choices {
            return Err(SettingsError::InvalidMinItems {
                min_items: drills.picture_quiz_min_items,
                choices: drills.picture_quiz_choices,
            });
        }
        if drills.bubble_pop_max_bubbles == 0 {
            return Err(SettingsError::InvalidBubbleCount);
        }
        if drills.matching_min_items == 0 || drills.matching_max_items < drills.matching_min_items {
            return Err(SettingsError::InvalidMatchingRange {
                min_items: drills.matching_min_items,
                max_items: drills.matching_max_items,
            });
        }

        Ok(Settings {
            weights: self.weights,
            ranking: self.ranking,
            drills,
        })
    }
}

impl Settings {
    #[must_use]
    pub fn weights(&self) -> &PointWeights {
        &self.weights
    }

    #[must_use]
    pub fn ranking(&self) -> RankingPolicy {
        self.ranking
    }

    #[must_use]
    pub fn drills(&self) -> &DrillSettings {
        &self.drills
    }

    #[must_use]
    pub fn with_ranking(mut self, ranking: RankingPolicy) -> Self {
        self.ranking = ranking;
        self
    }
}
