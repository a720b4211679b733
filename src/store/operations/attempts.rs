use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// One answered question. Append-only; keyed newest-first per student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub id: String,
    pub student_id: String,
    pub question_id: String,
    pub concept_id: String,
    pub is_correct: bool,
    pub selected_option: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken_seconds: Option<u32>,
    pub xp_earned: i64,
    pub attempted_at: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn attempted_on(&self) -> NaiveDate {
        self.attempted_at.date_naive()
    }
}

impl Store {
    pub fn create_attempt(&self, attempt: &AttemptRecord) -> Result<(), StoreError> {
        let key = keys::attempt_key(
            &attempt.student_id,
            attempt.attempted_at.timestamp_millis(),
            &attempt.id,
        );
        self.attempts
            .insert(key.as_bytes(), Self::serialize(attempt)?)?;
        Ok(())
    }

    /// Attempt history for a student, newest first.
    pub fn list_attempts(
        &self,
        student_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<AttemptRecord>, StoreError> {
        let prefix = keys::attempt_prefix(student_id);
        let mut attempts = Vec::new();
        for item in self
            .attempts
            .scan_prefix(prefix.as_bytes())
            .skip(offset)
            .take(limit)
        {
            let (_, v) = item?;
            attempts.push(Self::deserialize::<AttemptRecord>(&v)?);
        }
        Ok(attempts)
    }

    pub fn count_attempts(&self, student_id: &str) -> Result<u64, StoreError> {
        let prefix = keys::attempt_prefix(student_id);
        let mut count = 0u64;
        for item in self.attempts.scan_prefix(prefix.as_bytes()) {
            item?;
            count += 1;
        }
        Ok(count)
    }
}
