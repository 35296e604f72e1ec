#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{
    ActivityResultRecord, AttemptResultRepository, InMemoryRepository, RosterRepository, Storage,
    StorageError, VocabularyRepository,
};
