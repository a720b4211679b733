pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub chapters: sled::Tree,
    pub topics: sled::Tree,
    pub concepts: sled::Tree,
    pub questions: sled::Tree,
    pub mastery_records: sled::Tree,
    pub mastery_due_index: sled::Tree,
    pub chapter_progress: sled::Tree,
    pub attempts: sled::Tree,
    pub student_stats: sled::Tree,
    pub daily_analytics: sled::Tree,
    pub meta: sled::Tree,
    // Secondary index trees
    pub questions_by_concept: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
    #[error("CAS retry exhausted after {attempts} attempts: entity={entity}, key={key}")]
    CasRetryExhausted {
        entity: String,
        key: String,
        attempts: u32,
    },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let chapters = db.open_tree(trees::CHAPTERS)?;
        let topics = db.open_tree(trees::TOPICS)?;
        let concepts = db.open_tree(trees::CONCEPTS)?;
        let questions = db.open_tree(trees::QUESTIONS)?;
        let mastery_records = db.open_tree(trees::MASTERY_RECORDS)?;
        let mastery_due_index = db.open_tree(trees::MASTERY_DUE_INDEX)?;
        let chapter_progress = db.open_tree(trees::CHAPTER_PROGRESS)?;
        let attempts = db.open_tree(trees::ATTEMPTS)?;
        let student_stats = db.open_tree(trees::STUDENT_STATS)?;
        let daily_analytics = db.open_tree(trees::DAILY_ANALYTICS)?;
        let meta = db.open_tree(trees::META)?;
        // Secondary index trees
        let questions_by_concept = db.open_tree(trees::QUESTIONS_BY_CONCEPT)?;

        Ok(Self {
            db,
            chapters,
            topics,
            concepts,
            questions,
            mastery_records,
            mastery_due_index,
            chapter_progress,
            attempts,
            student_stats,
            daily_analytics,
            meta,
            questions_by_concept,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub fn raw_db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
