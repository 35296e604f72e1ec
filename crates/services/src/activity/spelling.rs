use rand::seq::SliceRandom;

use vocab_core::model::{ActivityKind, ImageRef, VocabularyItem};

use super::runner::{ActivityRunner, AttemptOutcome, SessionSummary};
use crate::error::ActivityError;

/// Difficulty of the spelling drill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpellingLevel {
    /// Word, picture and scrambled tiles.
    #[default]
    One,
    /// Picture and scrambled tiles; the word is hidden.
    Two,
    /// Picture only; the answer is typed.
    Three,
}

impl SpellingLevel {
    #[must_use]
    pub fn from_u8(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    fn uses_tiles(self) -> bool {
        !matches!(self, Self::Three)
    }
}

/// One scrambled letter of the current word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterTile {
    pub letter: char,
    pub used: bool,
}

/// What the learner sees for the current word at the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellingPrompt<'a> {
    pub word: Option<&'a str>,
    pub image: Option<&'a ImageRef>,
    pub definition: Option<&'a str>,
}

/// Spell each word from scrambled tiles (levels 1 and 2) or by typing (level 3).
#[derive(Debug)]
pub struct SpellingDrill {
    runner: ActivityRunner,
    level: SpellingLevel,
    tiles: Vec<LetterTile>,
    /// Tile indices in the order they were placed.
    placed: Vec<usize>,
}

impl SpellingDrill {
    /// # Errors
    ///
    /// Returns `ActivityError` if the runner rejects `items`.
    pub fn start(
        runner: ActivityRunner,
        items: Vec<VocabularyItem>,
        level: SpellingLevel,
    ) -> Result<Self, ActivityError> {
        let mut drill = Self {
            runner,
            level,
            tiles: Vec::new(),
            placed: Vec::new(),
        };
        drill.runner.start(items, ActivityKind::Spelling)?;
        drill.deal();
        Ok(drill)
    }

    #[must_use]
    pub fn level(&self) -> SpellingLevel {
        self.level
    }

    #[must_use]
    pub fn prompt(&self) -> Option<SpellingPrompt<'_>> {
        let item = self.runner.current_item()?;
        Some(SpellingPrompt {
            word: (self.level == SpellingLevel::One).then(|| item.word()),
            image: item.image(),
            definition: item.definition(),
        })
    }

    #[must_use]
    pub fn tiles(&self) -> &[LetterTile] {
        &self.tiles
    }

    /// Letters placed so far, in order.
    #[must_use]
    pub fn assembled(&self) -> String {
        self.placed.iter().map(|&i| self.tiles[i].letter).collect()
    }

    /// # Errors
    ///
    /// Returns `ActivityError::InvalidSelection` if the tile does not exist or is already placed.
    pub fn select_tile(&mut self, index: usize) -> Result<(), ActivityError> {
        match self.tiles.get_mut(index) {
            Some(tile) if !tile.used => {
                tile.used = true;
                self.placed.push(index);
                Ok(())
            }
            _ => Err(ActivityError::InvalidSelection { index }),
        }
    }

    /// Take the letter at `position` of the assembled answer back to the pool.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidSelection` if nothing is placed at `position`.
    pub fn remove_letter(&mut self, position: usize) -> Result<(), ActivityError> {
        if position >= self.placed.len() {
            return Err(ActivityError::InvalidSelection { index: position });
        }
        let tile = self.placed.remove(position);
        self.tiles[tile].used = false;
        Ok(())
    }

    #[must_use]
    pub fn ready_to_check(&self) -> bool {
        !self.tiles.is_empty() && self.placed.len() == self.tiles.len()
    }

    /// Submit the assembled tiles.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::IncompleteAnswer` until every tile is placed, or the
    /// runner's error if no word is being presented.
    pub fn check(&mut self) -> Result<AttemptOutcome, ActivityError> {
        if !self.ready_to_check() {
            let expected = self
                .runner
                .current_item()
                .map_or(self.tiles.len(), |item| item.word().chars().count());
            return Err(ActivityError::IncompleteAnswer {
                expected,
                given: self.placed.len(),
            });
        }
        let answer = self.assembled();
        self.submit(&answer)
    }

    /// Submit a typed answer. Accepted at every level.
    ///
    /// # Errors
    ///
    /// Returns the runner's error if no word is being presented.
    pub fn type_answer(&mut self, text: &str) -> Result<AttemptOutcome, ActivityError> {
        self.submit(text)
    }

    fn submit(&mut self, answer: &str) -> Result<AttemptOutcome, ActivityError> {
        let outcome = self.runner.submit_attempt(answer)?;
        if outcome.is_correct() {
            self.deal();
        } else {
            self.reset_tiles();
        }
        Ok(outcome)
    }

    /// Switch difficulty and start over on a fresh shuffle.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` if the drill was never started.
    pub fn change_level(&mut self, level: SpellingLevel) -> Result<(), ActivityError> {
        self.level = level;
        self.restart()
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
    /// Returns `ActivityError::InvalidState` before every word is spelled.
    pub fn summary(&self) -> Result<SessionSummary, ActivityError> {
        self.runner.summary()
    }

    #[must_use]
    pub fn runner(&self) -> &ActivityRunner {
        &self.runner
    }

    fn deal(&mut self) {
        self.placed.clear();
        self.tiles.clear();
        if !self.level.uses_tiles() {
            return;
        }
        let Some(word) = self.runner.current_item().map(|item| item.word().to_owned()) else {
            return;
        };
        self.tiles = word
            .chars()
            .map(|letter| LetterTile {
                letter,
                used: false,
            })
            .collect();
        self.tiles.shuffle(self.runner.rng());
    }

    fn reset_tiles(&mut self) {
        self.placed.clear();
        for tile in &mut self.tiles {
            tile.used = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::Advance;
    use vocab_core::model::WordId;
    use vocab_core::time::fixed_clock;

    fn drill(words: &[&str], level: SpellingLevel) -> SpellingDrill {
        let items = words
            .iter()
            .zip(1_u64..)
            .map(|(w, id)| VocabularyItem::text_only(WordId::new(id), *w).unwrap())
            .collect();
        SpellingDrill::start(ActivityRunner::new(fixed_clock()).with_seed(3), items, level).unwrap()
    }

    fn spell_current(drill: &mut SpellingDrill) {
        let word = drill.runner().current_item().unwrap().word().to_owned();
        for letter in word.chars() {
            let index = drill
                .tiles()
                .iter()
                .position(|t| t.letter == letter && !t.used)
                .unwrap();
            drill.select_tile(index).unwrap();
        }
    }

    #[test]
    fn tiles_are_a_permutation_of_the_word() {
        let drill = drill(&["planet"], SpellingLevel::One);
        let mut letters: Vec<char> = drill.tiles().iter().map(|t| t.letter).collect();
        letters.sort_unstable();
        let mut expected: Vec<char> = "planet".chars().collect();
        expected.sort_unstable();
        assert_eq!(letters, expected);
    }

    #[test]
    fn level_two_hides_the_word() {
        let one = drill(&["cat"], SpellingLevel::One);
        let two = drill(&["cat"], SpellingLevel::Two);
        assert_eq!(one.prompt().unwrap().word, Some("cat"));
        assert_eq!(two.prompt().unwrap().word, None);
        assert_eq!(two.tiles().len(), 3);
    }

    #[test]
    fn level_three_has_no_tiles_and_accepts_typing() {
        let mut drill = drill(&["cat"], SpellingLevel::Three);
        assert!(drill.tiles().is_empty());
        assert!(!drill.ready_to_check());

        let outcome = drill.type_answer("Cat").unwrap();
        assert_eq!(outcome.advance, Advance::Complete);
    }

    #[test]
    fn check_requires_every_tile() {
        let mut drill = drill(&["sun"], SpellingLevel::One);
        drill.select_tile(0).unwrap();

        let err = drill.check().unwrap_err();
        assert!(matches!(
            err,
            ActivityError::IncompleteAnswer {
                expected: 3,
                given: 1
            }
        ));
    }

    #[test]
    fn removing_a_letter_frees_its_tile() {
        let mut drill = drill(&["sun"], SpellingLevel::One);
        drill.select_tile(2).unwrap();
        drill.select_tile(0).unwrap();

        drill.remove_letter(0).unwrap();

        assert!(!drill.tiles()[2].used);
        assert!(drill.tiles()[0].used);
        assert_eq!(drill.assembled().len(), 1);
        assert!(matches!(
            drill.select_tile(0),
            Err(ActivityError::InvalidSelection { index: 0 })
        ));
        assert!(matches!(
            drill.remove_letter(4),
            Err(ActivityError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn wrong_check_resets_tiles_for_same_word() {
        let mut drill = drill(&["ab"], SpellingLevel::One);
        let b_first = drill.tiles()[0].letter == 'b';
        // place tiles so the result reads "ba"
        let (first, second) = if b_first { (0, 1) } else { (1, 0) };
        drill.select_tile(first).unwrap();
        drill.select_tile(second).unwrap();

        let outcome = drill.check().unwrap();

        assert_eq!(outcome.advance, Advance::Retry);
        assert!(drill.tiles().iter().all(|t| !t.used));
        assert!(drill.assembled().is_empty());
    }

    #[test]
    fn correct_check_deals_the_next_word() {
        let mut drill = drill(&["cat", "horse"], SpellingLevel::Two);
        spell_current(&mut drill);
        assert!(drill.ready_to_check());

        let outcome = drill.check().unwrap();

        assert_eq!(outcome.advance, Advance::Next);
        let next = drill.runner().current_item().unwrap().word().chars().count();
        assert_eq!(drill.tiles().len(), next);
        assert!(drill.assembled().is_empty());

        spell_current(&mut drill);
        drill.check().unwrap();
        assert_eq!(drill.summary().unwrap().percentage, 100);
        assert!(drill.tiles().is_empty());
    }

    #[test]
    fn changing_level_restarts() {
        let mut drill = drill(&["cat", "dog"], SpellingLevel::One);
        drill.type_answer("wrong").unwrap();

        drill.change_level(SpellingLevel::Three).unwrap();

        assert_eq!(drill.level(), SpellingLevel::Three);
        assert_eq!(drill.runner().progress().unwrap().attempts, 0);
        assert!(drill.tiles().is_empty());
    }

    #[test]
    fn level_numbers_round_trip() {
        for n in 1..=3 {
            assert_eq!(SpellingLevel::from_u8(n).unwrap().as_u8(), n);
        }
        assert_eq!(SpellingLevel::from_u8(0), None);
        assert_eq!(SpellingLevel::from_u8(4), None);
    }
}
