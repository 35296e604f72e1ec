use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use storage::repository::{AttemptResultRepository, RosterRepository};
use vocab_core::leaderboard::LeaderboardEntry;
use vocab_core::model::{AttemptResult, ClassId, StudentId};

use crate::activity::AttemptListener;
use crate::error::PersistenceFailure;
use crate::leaderboard::LeaderboardService;

struct LeaderboardFeed {
    service: LeaderboardService,
    updates: watch::Sender<Vec<LeaderboardEntry>>,
    /// Held from fetch to publish so the last board sent is the last one read.
    refresh: Mutex<()>,
}

/// Forwards attempt results to storage in the background.
///
/// Writes are spawned on the runtime handle and never reported back to the runner.
/// A failed write is logged and surfaces only through the returned `JoinHandle`.
#[derive(Clone)]
pub struct ResultRecorder {
    handle: Handle,
    results: Arc<dyn AttemptResultRepository>,
    roster: Arc<dyn RosterRepository>,
    student_id: StudentId,
    class_id: ClassId,
    feed: Option<Arc<LeaderboardFeed>>,
}

impl ResultRecorder {
    #[must_use]
    pub fn new(
        handle: Handle,
        results: Arc<dyn AttemptResultRepository>,
        roster: Arc<dyn RosterRepository>,
        student_id: StudentId,
        class_id: ClassId,
    ) -> Self {
        Self {
            handle,
            results,
            roster,
            student_id,
            class_id,
            feed: None,
        }
    }

    /// Recompute the class leaderboard after every stored result.
    #[must_use]
    pub fn with_leaderboard(mut self, service: LeaderboardService) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        self.feed = Some(Arc::new(LeaderboardFeed {
            service,
            updates,
            refresh: Mutex::new(()),
        }));
        self
    }

    /// Receiver for leaderboard refreshes; `None` unless `with_leaderboard` was called.
    #[must_use]
    pub fn leaderboard_updates(&self) -> Option<watch::Receiver<Vec<LeaderboardEntry>>> {
        self.feed.as_ref().map(|feed| feed.updates.subscribe())
    }

    #[must_use]
    pub fn student_id(&self) -> StudentId {
        self.student_id
    }

    #[must_use]
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Spawn the write for `result` and return immediately.
    pub fn record(&self, result: &AttemptResult) -> JoinHandle<Result<(), PersistenceFailure>> {
        let recorder = self.clone();
        let result = result.clone();
        self.handle
            .spawn(async move { recorder.persist(&result).await })
    }

    async fn persist(&self, result: &AttemptResult) -> Result<(), PersistenceFailure> {
        let student_id = self.student_id;
        let class_id = self.class_id;

        match self.roster.is_enrolled(class_id, student_id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(
                    student_id = %student_id,
                    class_id = %class_id,
                    "student not enrolled, result not saved"
                );
                return Err(PersistenceFailure::NotEnrolled {
                    student_id,
                    class_id,
                });
            }
            Err(err) => {
                tracing::error!(error = %err, student_id = %student_id, "enrollment check failed");
                return Err(err.into());
            }
        }

        if let Err(err) = self
            .results
            .record_attempt_result(student_id, class_id, result)
            .await
        {
            tracing::error!(
                error = %err,
                student_id = %student_id,
                item_id = %result.item_id(),
                kind = %result.kind(),
                "failed to save activity result"
            );
            return Err(err.into());
        }
        tracing::debug!(
            student_id = %student_id,
            item_id = %result.item_id(),
            correct = result.is_correct(),
            "activity result saved"
        );

        if let Some(feed) = &self.feed {
            let _refresh = feed.refresh.lock().await;
            match feed.service.leaderboard(class_id).await {
                Ok(board) => {
                    feed.updates.send_replace(board);
                }
                Err(err) => {
                    tracing::warn!(error = %err, class_id = %class_id, "leaderboard refresh failed");
                }
            }
        }
        Ok(())
    }
}

impl AttemptListener for ResultRecorder {
    fn on_attempt(&self, result: &AttemptResult) {
        drop(self.record(result));
    }
}

impl std::fmt::Debug for ResultRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultRecorder")
            .field("student_id", &self.student_id)
            .field("class_id", &self.class_id)
            .field("leaderboard", &self.feed.is_some())
            .finish_non_exhaustive()
    }
}
