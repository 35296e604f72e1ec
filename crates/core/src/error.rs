use thiserror::Error;

use crate::model::{AttemptError, SettingsError, VocabularyItemError};

/// Umbrella for domain validation failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Vocabulary(#[from] VocabularyItemError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SettingsDraft, VocabularyItem, WordId};

    fn build() -> Result<VocabularyItem, Error> {
        let mut draft = SettingsDraft::new();
        draft.drills.picture_quiz_choices = 3;
        draft.validate()?;
        Ok(VocabularyItem::text_only(WordId::new(1), "  ")?)
    }

    #[test]
    fn domain_errors_convert_into_umbrella() {
        let err = build().unwrap_err();
        assert!(matches!(err, Error::Vocabulary(VocabularyItemError::EmptyWord)));
        assert_eq!(err.to_string(), "vocabulary word cannot be empty");
    }
}
