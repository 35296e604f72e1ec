use rand::seq::{IndexedRandom, SliceRandom};

use vocab_core::model::{ActivityKind, DrillSettings, ImageRef, VocabularyItem, WordId};

use super::runner::{ActivityRunner, AttemptOutcome, SessionSummary};
use crate::error::ActivityError;

/// One answer button under the picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    pub item_id: WordId,
    pub word: String,
}

/// Show a picture and pick its word from a handful of options.
#[derive(Debug)]
pub struct PictureQuizDrill {
    runner: ActivityRunner,
    choices: usize,
    options: Vec<QuizOption>,
}

impl PictureQuizDrill {
    /// Start a quiz over the items that have a picture.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::NotEnoughItems` if fewer than
    /// `picture_quiz_min_items` items have a picture.
    pub fn start(
        runner: ActivityRunner,
        items: Vec<VocabularyItem>,
        settings: &DrillSettings,
    ) -> Result<Self, ActivityError> {
        let eligible: Vec<VocabularyItem> =
            items.into_iter().filter(VocabularyItem::has_image).collect();
        if eligible.len() < settings.picture_quiz_min_items {
            return Err(ActivityError::NotEnoughItems {
                required: settings.picture_quiz_min_items,
                available: eligible.len(),
            });
        }

        let mut drill = Self {
            runner,
            choices: settings.picture_quiz_choices,
            options: Vec::new(),
        };
        drill.runner.start(eligible, ActivityKind::PictureQuiz)?;
        drill.build_options();
        Ok(drill)
    }

    #[must_use]
    pub fn picture(&self) -> Option<&ImageRef> {
        self.runner.current_item().and_then(VocabularyItem::image)
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    /// Answer with the option at `index`. A wrong answer keeps the same picture and options.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidSelection` if there is no option at `index`, or the
    /// runner's error if no picture is being presented.
    pub fn choose(&mut self, index: usize) -> Result<AttemptOutcome, ActivityError> {
        let chosen = self
            .options
            .get(index)
            .map(|option| option.item_id)
            .ok_or(ActivityError::InvalidSelection { index })?;
        let outcome = self.runner.submit_choice(chosen)?;
        if outcome.is_correct() {
            self.build_options();
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` if the drill was never started.
    pub fn restart(&mut self) -> Result<(), ActivityError> {
        self.runner.restart()?;
        self.build_options();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` before every picture is answered.
    pub fn summary(&self) -> Result<SessionSummary, ActivityError> {
        self.runner.summary()
    }

    #[must_use]
    pub fn runner(&self) -> &ActivityRunner {
        &self.runner
    }

    fn build_options(&mut self) {
        self.options.clear();
        let Some(current) = self.runner.current_item().cloned() else {
            return;
        };
        let pool: Vec<QuizOption> = self
            .runner
            .session()
            .map(|session| {
                session
                    .queue()
                    .iter()
                    .filter(|item| item.id() != current.id())
                    .map(option_for)
                    .collect()
            })
            .unwrap_or_default();

        let rng = self.runner.rng();
        let distractors = self.choices.saturating_sub(1);
        self.options.push(option_for(&current));
        self.options
            .extend(pool.choose_multiple(rng, distractors).cloned());
        self.options.shuffle(rng);
    }
}

fn option_for(item: &VocabularyItem) -> QuizOption {
    QuizOption {
        item_id: item.id(),
        word: item.word().to_owned(),
    }
}
