use rand::seq::SliceRandom;

use vocab_core::model::{ActivityKind, DrillSettings, ImageRef, VocabularyItem, WordId};

use super::runner::{ActivityRunner, AttemptOutcome, SessionSummary};
use crate::error::ActivityError;

/// A picture card on the matching board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureCard {
    pub item_id: WordId,
    pub image: ImageRef,
}

/// Match the prompted word to its card on a shuffled board.
#[derive(Debug)]
pub struct MatchingDrill {
    runner: ActivityRunner,
    board: Vec<PictureCard>,
}

impl MatchingDrill {
    /// Start a game over the items that have a picture, keeping at most
    /// `matching_max_items` of them in list order.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::NotEnoughItems` if fewer than `matching_min_items`
    /// items have a picture, or the runner's error if it rejects them.
    pub fn start(
        runner: ActivityRunner,
        items: Vec<VocabularyItem>,
        settings: &DrillSettings,
    ) -> Result<Self, ActivityError> {
        let mut eligible: Vec<VocabularyItem> =
            items.into_iter().filter(VocabularyItem::has_image).collect();
        if eligible.len() < settings.matching_min_items {
            return Err(ActivityError::NotEnoughItems {
                required: settings.matching_min_items,
                available: eligible.len(),
            });
        }
        eligible.truncate(settings.matching_max_items);

        let mut drill = Self {
            runner,
            board: Vec::new(),
        };
        drill.runner.start(eligible, ActivityKind::Matching)?;
        drill.deal();
        Ok(drill)
    }

    /// The word to find on the board.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.runner.current_item().map(VocabularyItem::word)
    }

    /// Cards still on the board.
    #[must_use]
    pub fn board(&self) -> &[PictureCard] {
        &self.board
    }

    /// Pick a card. A match removes it from the board; a miss leaves the board as it is.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidSelection` if there is no card at `index`, or the
    /// runner's error if no word is being presented.
    pub fn select_card(&mut self, index: usize) -> Result<AttemptOutcome, ActivityError> {
        let chosen = self
            .board
            .get(index)
            .map(|card| card.item_id)
            .ok_or(ActivityError::InvalidSelection { index })?;
        let outcome = self.runner.submit_choice(chosen)?;
        if outcome.is_correct() {
            self.board.remove(index);
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` if the drill was never started.
    pub fn restart(&mut self) -> Result<(), ActivityError> {
        self.runner.restart()?;
        self.deal();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` before every card is matched.
    pub fn summary(&self) -> Result<SessionSummary, ActivityError> {
        self.runner.summary()
    }

    #[must_use]
    pub fn runner(&self) -> &ActivityRunner {
        &self.runner
    }

    fn deal(&mut self) {
        self.board = self
            .runner
            .session()
            .map(|session| {
                session
                    .queue()
                    .iter()
                    .filter_map(|item| {
                        item.image().map(|image| PictureCard {
                            item_id: item.id(),
                            image: image.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.board.shuffle(self.runner.rng());
    }
}
