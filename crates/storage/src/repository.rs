use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use vocab_core::model::{
    AttemptResult, ClassId, ListId, StudentAttempt, StudentId, StudentIdentity, VocabularyItem,
    WordId,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of a row in the `activity_results` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityResultRecord {
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub vocabulary_word_id: WordId,
    pub activity_type: String,
    pub is_correct: bool,
    pub attempt_count: u32,
    pub created_at: DateTime<Utc>,
}

impl ActivityResultRecord {
    #[must_use]
    pub fn from_result(student_id: StudentId, class_id: ClassId, result: &AttemptResult) -> Self {
        Self {
            student_id,
            class_id,
            vocabulary_word_id: result.item_id(),
            activity_type: result.kind().as_str().to_owned(),
            is_correct: result.is_correct(),
            attempt_count: result.attempt_count(),
            created_at: result.timestamp(),
        }
    }

    /// Narrow the row down to what the leaderboard needs.
    #[must_use]
    pub fn into_student_attempt(self) -> StudentAttempt {
        StudentAttempt::new(self.student_id, self.activity_type, self.is_correct)
    }
}

/// Source of the words in a vocabulary list.
#[async_trait]
pub trait VocabularyRepository: Send + Sync {
    /// Fetch every word of a list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the list does not exist, or other storage errors.
    async fn fetch_vocabulary_items(&self, list_id: ListId)
    -> Result<Vec<VocabularyItem>, StorageError>;
}

/// Class membership.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Fetch the students enrolled in a class. Unknown classes have an empty roster.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the roster cannot be read.
    async fn fetch_roster(&self, class_id: ClassId) -> Result<Vec<StudentIdentity>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if membership cannot be checked.
    async fn is_enrolled(&self, class_id: ClassId, student_id: StudentId)
    -> Result<bool, StorageError>;
}

/// Append-only log of activity results.
#[async_trait]
pub trait AttemptResultRepository: Send + Sync {
    /// Append one result for a student in a class.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be written.
    async fn record_attempt_result(
        &self,
        student_id: StudentId,
        class_id: ClassId,
        result: &AttemptResult,
    ) -> Result<(), StorageError>;

    /// Fetch every result written by any of the given students.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if results cannot be read.
    async fn fetch_results_for_roster(
        &self,
        student_ids: &[StudentId],
    ) -> Result<Vec<ActivityResultRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    lists: Arc<Mutex<HashMap<ListId, Vec<VocabularyItem>>>>,
    rosters: Arc<Mutex<HashMap<ClassId, Vec<StudentIdentity>>>>,
    results: Arc<Mutex<Vec<ActivityResultRecord>>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the words of a list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn insert_list(
        &self,
        list_id: ListId,
        items: Vec<VocabularyItem>,
    ) -> Result<(), StorageError> {
        let mut guard = self.lists.lock().map_err(poisoned)?;
        guard.insert(list_id, items);
        Ok(())
    }

    /// Add a student to a class; enrolling twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn enroll(&self, class_id: ClassId, student: StudentIdentity) -> Result<(), StorageError> {
        let mut guard = self.rosters.lock().map_err(poisoned)?;
        let roster = guard.entry(class_id).or_default();
        if !roster.iter().any(|s| s.id == student.id) {
            roster.push(student);
        }
        Ok(())
    }

    /// Snapshot of all recorded rows, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn records(&self) -> Result<Vec<ActivityResultRecord>, StorageError> {
        let guard = self.results.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl VocabularyRepository for InMemoryRepository {
    async fn fetch_vocabulary_items(
        &self,
        list_id: ListId,
    ) -> Result<Vec<VocabularyItem>, StorageError> {
        let guard = self.lists.lock().map_err(poisoned)?;
        guard.get(&list_id).cloned().ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl RosterRepository for InMemoryRepository {
    async fn fetch_roster(&self, class_id: ClassId) -> Result<Vec<StudentIdentity>, StorageError> {
        let guard = self.rosters.lock().map_err(poisoned)?;
        Ok(guard.get(&class_id).cloned().unwrap_or_default())
    }

    async fn is_enrolled(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> Result<bool, StorageError> {
        let guard = self.rosters.lock().map_err(poisoned)?;
        Ok(guard
            .get(&class_id)
            .is_some_and(|roster| roster.iter().any(|s| s.id == student_id)))
    }
}

#[async_trait]
impl AttemptResultRepository for InMemoryRepository {
    async fn record_attempt_result(
        &self,
        student_id: StudentId,
        class_id: ClassId,
        result: &AttemptResult,
    ) -> Result<(), StorageError> {
        let mut guard = self.results.lock().map_err(poisoned)?;
        guard.push(ActivityResultRecord::from_result(student_id, class_id, result));
        Ok(())
    }

    async fn fetch_results_for_roster(
        &self,
        student_ids: &[StudentId],
    ) -> Result<Vec<ActivityResultRecord>, StorageError> {
        let guard = self.results.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|r| student_ids.contains(&r.student_id))
            .cloned()
            .collect())
    }
}

/// Bundles the collaborator interfaces behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub vocabulary: Arc<dyn VocabularyRepository>,
    pub roster: Arc<dyn RosterRepository>,
    pub results: Arc<dyn AttemptResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        let vocabulary: Arc<dyn VocabularyRepository> = Arc::new(repo.clone());
        let roster: Arc<dyn RosterRepository> = Arc::new(repo.clone());
        let results: Arc<dyn AttemptResultRepository> = Arc::new(repo);
        Self {
            vocabulary,
            roster,
            results,
        }
    }
}
