use std::sync::Arc;

use storage::repository::{AttemptResultRepository, RosterRepository};
use vocab_core::leaderboard::{LeaderboardEntry, ScoreAggregator};
use vocab_core::model::{ClassId, Settings, StudentId};

use crate::error::LeaderboardError;

/// Builds a class leaderboard from the roster and the stored results.
#[derive(Clone)]
pub struct LeaderboardService {
    roster: Arc<dyn RosterRepository>,
    results: Arc<dyn AttemptResultRepository>,
    aggregator: ScoreAggregator,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(
        roster: Arc<dyn RosterRepository>,
        results: Arc<dyn AttemptResultRepository>,
        settings: Settings,
    ) -> Self {
        Self {
            roster,
            results,
            aggregator: ScoreAggregator::new(settings),
        }
    }

    /// Rank every student enrolled in `class_id`.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Storage` if the roster or the results cannot be read.
    pub async fn leaderboard(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let roster = self.roster.fetch_roster(class_id).await?;
        if roster.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<StudentId> = roster.iter().map(|s| s.id).collect();
        let attempts: Vec<_> = self
            .results
            .fetch_results_for_roster(&ids)
            .await?
            .into_iter()
            .map(|record| record.into_student_attempt())
            .collect();

        let board = self.aggregator.aggregate(&attempts, &roster);
        tracing::debug!(
            class_id = %class_id,
            students = board.len(),
            results = attempts.len(),
            "leaderboard computed"
        );
        Ok(board)
    }
}

impl std::fmt::Debug for LeaderboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardService")
            .field("aggregator", &self.aggregator)
            .finish_non_exhaustive()
    }
}
