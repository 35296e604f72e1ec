use rand::Rng;
use rand::seq::SliceRandom;

use vocab_core::model::{ActivityKind, DrillSettings, VocabularyItem};

use super::runner::{ActivityRunner, AttemptOutcome, SessionSummary};
use crate::error::ActivityError;

/// A floating letter; popping it appends the letter to the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bubble {
    pub letter: char,
    pub popped: bool,
}

/// Pop the word's letters, in order, out of a field of bubbles mixed with distractors.
#[derive(Debug)]
pub struct BubblePopDrill {
    runner: ActivityRunner,
    max_bubbles: usize,
    max_distractors: usize,
    bubbles: Vec<Bubble>,
    /// Lowercased current word; the bubbles are dealt from its letters.
    target: String,
    popped: String,
}

impl BubblePopDrill {
    /// # Errors
    ///
    /// Returns `ActivityError` if the runner rejects `items`.
    pub fn start(
        runner: ActivityRunner,
        items: Vec<VocabularyItem>,
        settings: &DrillSettings,
    ) -> Result<Self, ActivityError> {
        let mut drill = Self {
            runner,
            max_bubbles: settings.bubble_pop_max_bubbles,
            max_distractors: settings.bubble_pop_max_distractors,
            bubbles: Vec::new(),
            target: String::new(),
            popped: String::new(),
        };
        drill.runner.start(items, ActivityKind::BubblePop)?;
        drill.generate();
        Ok(drill)
    }

    #[must_use]
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Letters popped so far for the current word.
    #[must_use]
    pub fn popped(&self) -> &str {
        &self.popped
    }

    /// Pop a bubble. Returns the judged outcome once as many letters as the word has
    /// have been popped, `None` before that.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidSelection` for a missing or already popped bubble,
    /// or the runner's error if no word is being presented.
    pub fn pop(&mut self, index: usize) -> Result<Option<AttemptOutcome>, ActivityError> {
        if self.runner.current_item().is_none() {
            return Err(ActivityError::InvalidState {
                operation: "pop a bubble",
                state: self.runner.state(),
            });
        }
        let bubble = match self.bubbles.get_mut(index) {
            Some(bubble) if !bubble.popped => bubble,
            _ => return Err(ActivityError::InvalidSelection { index }),
        };
        bubble.popped = true;
        self.popped.push(bubble.letter);

        if self.popped.chars().count() < self.target.chars().count() {
            return Ok(None);
        }

        let answer = std::mem::take(&mut self.popped);
        let outcome = self.runner.submit_attempt(&answer)?;
        self.generate();
        Ok(Some(outcome))
    }

    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` if the drill was never started.
    pub fn restart(&mut self) -> Result<(), ActivityError> {
        self.runner.restart()?;
        self.generate();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` before every word is popped.
    pub fn summary(&self) -> Result<SessionSummary, ActivityError> {
        self.runner.summary()
    }

    #[must_use]
    pub fn runner(&self) -> &ActivityRunner {
        &self.runner
    }

    fn generate(&mut self) {
        self.popped.clear();
        self.bubbles.clear();
        self.target.clear();
        let Some(word) = self.runner.current_item().map(|i| i.word().to_lowercase()) else {
            return;
        };
        let letters = word.chars().count();
        let distractors = self
            .max_bubbles
            .saturating_sub(letters)
            .min(self.max_distractors);

        let rng = self.runner.rng();
        self.bubbles.extend(word.chars().map(|letter| Bubble {
            letter,
            popped: false,
        }));
        self.target = word;
        for _ in 0..distractors {
            self.bubbles.push(Bubble {
                letter: char::from(rng.random_range(b'a'..=b'z')),
                popped: false,
            });
        }
        self.bubbles.shuffle(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::Advance;
    use vocab_core::model::WordId;
    use vocab_core::time::fixed_clock;

    fn drill(words: &[&str], settings: DrillSettings) -> BubblePopDrill {
        let items = words
            .iter()
            .zip(1_u64..)
            .map(|(w, id)| VocabularyItem::text_only(WordId::new(id), *w).unwrap())
            .collect();
        BubblePopDrill::start(
            ActivityRunner::new(fixed_clock()).with_seed(11),
            items,
            &settings,
        )
        .unwrap()
    }

    fn pop_word(drill: &mut BubblePopDrill, word: &str) -> Option<AttemptOutcome> {
        let mut last = None;
        for letter in word.chars() {
            let index = drill
                .bubbles()
                .iter()
                .position(|b| b.letter == letter && !b.popped)
                .unwrap();
            last = drill.pop(index).unwrap();
        }
        last
    }

    #[test]
    fn bubble_count_respects_limits() {
        let d = drill(&["cat"], DrillSettings::default());
        assert_eq!(d.bubbles().len(), 18);

        let long = "abcdefghijklmnopqrstuvwxy";
        let d = drill(&[long], DrillSettings::default());
        assert_eq!(d.bubbles().len(), long.len());

        let tight = DrillSettings {
            bubble_pop_max_bubbles: 6,
            ..DrillSettings::default()
        };
        assert_eq!(drill(&["cat"], tight).bubbles().len(), 6);
    }

    #[test]
    fn bubbles_contain_every_letter_in_lowercase() {
        let d = drill(&["Moon"], DrillSettings::default());
        for letter in "moon".chars() {
            let needed = "moon".chars().filter(|&c| c == letter).count();
            let present = d.bubbles().iter().filter(|b| b.letter == letter).count();
            assert!(present >= needed);
        }
        assert!(d.bubbles().iter().all(|b| b.letter.is_ascii_lowercase()));
    }

    #[test]
    fn resolves_after_word_length_pops() {
        let mut d = drill(&["sun", "sky"], DrillSettings::default());
        let word = d.runner().current_item().unwrap().word().to_owned();

        let outcome = pop_word(&mut d, &word).unwrap();

        assert_eq!(outcome.advance, Advance::Next);
        assert!(d.popped().is_empty());
        assert!(d.bubbles().iter().all(|b| !b.popped));
    }

    #[test]
    fn wrong_order_is_a_retry() {
        let mut d = drill(&["ab"], DrillSettings::default());
        assert_eq!(pop_word(&mut d, "b"), None);

        let outcome = pop_word(&mut d, "a").unwrap();

        assert_eq!(outcome.advance, Advance::Retry);
        assert_eq!(outcome.result.attempt_count(), 1);
        assert_eq!(d.runner().current_item().unwrap().word(), "ab");
        // 2 letters + min(20 - 2, 15) distractors
        assert_eq!(d.bubbles().len(), 17);

        let outcome = pop_word(&mut d, "ab").unwrap();
        assert_eq!(outcome.advance, Advance::Complete);
        assert_eq!(outcome.result.attempt_count(), 2);
        assert_eq!(d.summary().unwrap().total_attempts, 2);
    }

    #[test]
    fn word_that_grows_when_lowercased_resolves_correctly() {
        // "İ" lowercases to "i" plus a combining dot
        let mut d = drill(&["İz"], DrillSettings::default());
        let lowered = "İz".to_lowercase();
        assert_eq!(lowered.chars().count(), 3);

        let mut letters = lowered.chars();
        let last = letters.next_back().unwrap();
        for letter in letters {
            assert_eq!(pop_word(&mut d, &letter.to_string()), None);
        }
        let outcome = pop_word(&mut d, &last.to_string()).unwrap();

        assert!(outcome.is_correct());
        assert_eq!(outcome.advance, Advance::Complete);
    }

    #[test]
    fn popping_twice_is_rejected() {
        let mut d = drill(&["cat"], DrillSettings::default());
        d.pop(0).unwrap();
        assert!(matches!(
            d.pop(0),
            Err(ActivityError::InvalidSelection { index: 0 })
        ));
        assert!(matches!(
            d.pop(99),
            Err(ActivityError::InvalidSelection { index: 99 })
        ));
    }
}
