//! Class leaderboard aggregation.
//!
//! The leaderboard is always rebuilt from the full result set; there is no
//! incremental update path, so repeated calls cannot drift.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{RankingPolicy, Settings, StudentAttempt, StudentId, StudentIdentity};

/// One row of the class leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub student_id: StudentId,
    pub display_name: String,
    pub total_attempts: u32,
    pub correct_attempts: u32,
    pub score: u32,
    pub rank: u32,
}

impl LeaderboardEntry {
    fn zeroed(student: &StudentIdentity) -> Self {
        Self {
            student_id: student.id,
            display_name: student.display_name.clone(),
            total_attempts: 0,
            correct_attempts: 0,
            score: 0,
            rank: 0,
        }
    }

    /// Share of correct attempts as a rounded percentage; 0 when nothing was attempted.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn accuracy(&self) -> u32 {
        if self.total_attempts == 0 {
            return 0;
        }
        // bounded to 0..=100 by correct <= total
        (f64::from(self.correct_attempts) / f64::from(self.total_attempts) * 100.0).round() as u32
    }
}

/// Turns per-attempt results into a ranked leaderboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator {
    settings: Settings,
}

impl ScoreAggregator {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the leaderboard for `roster` from `results`.
    ///
    /// Every roster member gets an entry, even with no attempts. Results for students
    /// outside the roster are ignored. Entries are ordered by score (descending), then
    /// correct attempts (descending), then student id (ascending), so the output is fully
    /// determined by the inputs.
    #[must_use]
    pub fn aggregate<'a>(
        &self,
        results: impl IntoIterator<Item = &'a StudentAttempt>,
        roster: &[StudentIdentity],
    ) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(roster.len());
        let mut index: HashMap<StudentId, usize> = HashMap::with_capacity(roster.len());
        for student in roster {
            if index.contains_key(&student.id) {
                continue;
            }
            index.insert(student.id, entries.len());
            entries.push(LeaderboardEntry::zeroed(student));
        }

        if entries.is_empty() {
            return entries;
        }

        let weights = self.settings.weights();
        for result in results {
            let Some(&slot) = index.get(&result.student_id) else {
                continue;
            };
            let entry = &mut entries[slot];
            entry.total_attempts = entry.total_attempts.saturating_add(1);
            if result.is_correct {
                entry.correct_attempts = entry.correct_attempts.saturating_add(1);
                entry.score = entry
                    .score
                    .saturating_add(weights.points_for(&result.activity_type));
            }
        }

        entries.sort_by(compare_entries);
        assign_ranks(&mut entries, self.settings.ranking());
        entries
    }
}

/// Aggregate with default settings.
#[must_use]
pub fn aggregate<'a>(
    results: impl IntoIterator<Item = &'a StudentAttempt>,
    roster: &[StudentIdentity],
) -> Vec<LeaderboardEntry> {
    ScoreAggregator::default().aggregate(results, roster)
}

fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.correct_attempts.cmp(&a.correct_attempts))
        .then_with(|| a.student_id.cmp(&b.student_id))
}

fn assign_ranks(entries: &mut [LeaderboardEntry], policy: RankingPolicy) {
    let mut previous: Option<(u32, u32)> = None;
    for (pos, entry) in entries.iter_mut().enumerate() {
        let position = u32::try_from(pos + 1).unwrap_or(u32::MAX);
        entry.rank = match (policy, previous) {
            (RankingPolicy::SharedTies, Some((score, rank))) if score == entry.score => rank,
            _ => position,
        };
        previous = Some((entry.score, entry.rank));
    }
}
