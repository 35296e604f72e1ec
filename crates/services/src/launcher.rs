use std::sync::Arc;

use storage::repository::VocabularyRepository;
use vocab_core::Clock;
use vocab_core::model::{ListId, Settings, VocabularyItem};

use crate::activity::{
    ActivityRunner, AttemptListener, BubblePopDrill, MatchingDrill, PictureQuizDrill,
    SpellingDrill, SpellingLevel,
};
use crate::error::LaunchError;

/// Loads a stored vocabulary list and starts a drill on it.
#[derive(Clone)]
pub struct ActivityLauncher {
    clock: Clock,
    vocabulary: Arc<dyn VocabularyRepository>,
    settings: Settings,
    listeners: Vec<Arc<dyn AttemptListener>>,
    seed: Option<u64>,
}

impl ActivityLauncher {
    #[must_use]
    pub fn new(clock: Clock, vocabulary: Arc<dyn VocabularyRepository>, settings: Settings) -> Self {
        Self {
            clock,
            vocabulary,
            settings,
            listeners: Vec::new(),
            seed: None,
        }
    }

    /// Subscribe `listener` to every runner this launcher creates.
    #[must_use]
    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: AttemptListener + 'static,
    {
        self.listeners.push(Arc::new(listener));
        self
    }

    /// Seed every runner's shuffle.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// # Errors
    ///
    /// Returns `LaunchError::Storage` if the list cannot be loaded and
    /// `LaunchError::Activity` if the drill cannot start on it.
    pub async fn spelling(
        &self,
        list_id: ListId,
        level: SpellingLevel,
    ) -> Result<SpellingDrill, LaunchError> {
        let items = self.load(list_id).await?;
        Ok(SpellingDrill::start(self.runner(), items, level)?)
    }

    /// # Errors
    ///
    /// Returns `LaunchError::Storage` if the list cannot be loaded and
    /// `LaunchError::Activity` if the drill cannot start on it.
    pub async fn bubble_pop(&self, list_id: ListId) -> Result<BubblePopDrill, LaunchError> {
        let items = self.load(list_id).await?;
        Ok(BubblePopDrill::start(
            self.runner(),
            items,
            self.settings.drills(),
        )?)
    }

    /// # Errors
    ///
    /// Returns `LaunchError::Storage` if the list cannot be loaded and
    /// `LaunchError::Activity` if too few words have pictures.
    pub async fn matching(&self, list_id: ListId) -> Result<MatchingDrill, LaunchError> {
        let items = self.load(list_id).await?;
        Ok(MatchingDrill::start(
            self.runner(),
            items,
            self.settings.drills(),
        )?)
    }

    /// # Errors
    ///
    /// Returns `LaunchError::Storage` if the list cannot be loaded and
    /// `LaunchError::Activity` if too few words have pictures.
    pub async fn picture_quiz(&self, list_id: ListId) -> Result<PictureQuizDrill, LaunchError> {
        let items = self.load(list_id).await?;
        Ok(PictureQuizDrill::start(
            self.runner(),
            items,
            self.settings.drills(),
        )?)
    }

    async fn load(&self, list_id: ListId) -> Result<Vec<VocabularyItem>, LaunchError> {
        let items = self
            .vocabulary
            .fetch_vocabulary_items(list_id)
            .await
            .inspect_err(|err| {
                tracing::warn!(error = %err, list_id = %list_id, "failed to load vocabulary list");
            })?;
        tracing::debug!(list_id = %list_id, items = items.len(), "vocabulary list loaded");
        Ok(items)
    }

    fn runner(&self) -> ActivityRunner {
        let mut runner = ActivityRunner::new(self.clock);
        if let Some(seed) = self.seed {
            runner = runner.with_seed(seed);
        }
        for listener in &self.listeners {
            runner.subscribe_shared(Arc::clone(listener));
        }
        runner
    }
}

impl std::fmt::Debug for ActivityLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityLauncher")
            .field("settings", &self.settings)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActivityError;
    use storage::repository::{InMemoryRepository, StorageError};
    use vocab_core::model::WordId;
    use vocab_core::time::fixed_clock;

    fn launcher(repo: InMemoryRepository) -> ActivityLauncher {
        ActivityLauncher::new(fixed_clock(), Arc::new(repo), Settings::default()).with_seed(1)
    }

    #[tokio::test]
    async fn launches_spelling_from_stored_list() {
        let repo = InMemoryRepository::new();
        let items = vec![
            VocabularyItem::text_only(WordId::new(1), "cat").unwrap(),
            VocabularyItem::text_only(WordId::new(2), "dog").unwrap(),
        ];
        repo.insert_list(ListId::new(1), items).unwrap();

        let drill = launcher(repo)
            .spelling(ListId::new(1), SpellingLevel::One)
            .await
            .unwrap();

        assert_eq!(drill.runner().progress().unwrap().total, 2);
    }

    #[tokio::test]
    async fn empty_list_surfaces_empty_input() {
        let repo = InMemoryRepository::new();
        repo.insert_list(ListId::new(1), Vec::new()).unwrap();

        let err = launcher(repo)
            .spelling(ListId::new(1), SpellingLevel::Two)
            .await
            .unwrap_err();

        assert!(matches!(err, LaunchError::Activity(ActivityError::EmptyInput)));
    }

    #[tokio::test]
    async fn missing_list_surfaces_storage_error() {
        let err = launcher(InMemoryRepository::new())
            .bubble_pop(ListId::new(8))
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchError::Storage(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn text_only_list_cannot_run_picture_drills() {
        let repo = InMemoryRepository::new();
        let items = (1..=5)
            .map(|id| VocabularyItem::text_only(WordId::new(id), format!("w{id}")).unwrap())
            .collect();
        repo.insert_list(ListId::new(2), items).unwrap();
        let launcher = launcher(repo);

        let quiz = launcher.picture_quiz(ListId::new(2)).await.unwrap_err();
        let matching = launcher.matching(ListId::new(2)).await.unwrap_err();

        assert!(matches!(
            quiz,
            LaunchError::Activity(ActivityError::NotEnoughItems { available: 0, .. })
        ));
        assert!(matches!(
            matching,
            LaunchError::Activity(ActivityError::NotEnoughItems {
                required: 3,
                available: 0
            })
        ));
    }
}
