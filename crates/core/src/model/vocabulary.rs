use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::WordId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VocabularyItemError {
    #[error("vocabulary word cannot be empty")]
    EmptyWord,

    #[error("invalid image reference: {0}")]
    InvalidImage(String),
}

//
// ─── IMAGE REFERENCE ───────────────────────────────────────────────────────────
//

/// Absolute URL of the picture attached to a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageRef(Url);

impl ImageRef {
    /// Parse an image reference.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyItemError::InvalidImage` if the input is blank or not an absolute URL.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, VocabularyItemError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(VocabularyItemError::InvalidImage("empty".into()));
        }
        Url::parse(raw)
            .map(Self)
            .map_err(|e| VocabularyItemError::InvalidImage(e.to_string()))
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ImageRef {
    type Error = VocabularyItemError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.0.into()
    }
}

//
// ─── VOCABULARY ITEM ───────────────────────────────────────────────────────────
//

/// A single word of a vocabulary list, immutable once loaded for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVocabularyItem")]
pub struct VocabularyItem {
    id: WordId,
    word: String,
    image: Option<ImageRef>,
    definition: Option<String>,
}

/// Wire shape of `VocabularyItem`; validated through `VocabularyItem::new`.
#[derive(Deserialize)]
struct RawVocabularyItem {
    id: WordId,
    word: String,
    #[serde(default)]
    image: Option<ImageRef>,
    #[serde(default)]
    definition: Option<String>,
}

impl TryFrom<RawVocabularyItem> for VocabularyItem {
    type Error = VocabularyItemError;

    fn try_from(raw: RawVocabularyItem) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.word, raw.image, raw.definition)
    }
}

impl VocabularyItem {
    /// Build a validated vocabulary item.
    ///
    /// The word is trimmed; a blank definition is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyItemError::EmptyWord` if the word is blank.
    pub fn new(
        id: WordId,
        word: impl Into<String>,
        image: Option<ImageRef>,
        definition: Option<String>,
    ) -> Result<Self, VocabularyItemError> {
        let word = word.into().trim().to_owned();
        if word.is_empty() {
            return Err(VocabularyItemError::EmptyWord);
        }
        let definition = definition
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            word,
            image,
            definition,
        })
    }

    /// Convenience constructor for a word without picture or definition.
    ///
    /// # Errors
    ///
    /// Returns `VocabularyItemError::EmptyWord` if the word is blank.
    pub fn text_only(id: WordId, word: impl Into<String>) -> Result<Self, VocabularyItemError> {
        Self::new(id, word, None, None)
    }

    #[must_use]
    pub fn id(&self) -> WordId {
        self.id
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Judge a typed or assembled answer against this word.
    ///
    /// Comparison is exact after trimming surrounding whitespace and lowercasing both sides.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.trim().to_lowercase() == self.word.to_lowercase()
    }
}
