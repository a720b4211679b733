use chrono::{DateTime, Utc};

use crate::constants::MAX_CAS_RETRIES;
use crate::mastery::tracker::{self, ChapterProgress};
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn get_chapter_progress(
        &self,
        student_id: &str,
        chapter_id: &str,
    ) -> Result<Option<ChapterProgress>, StoreError> {
        let key = keys::chapter_progress_key(student_id, chapter_id);
        match self.chapter_progress.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Roll one attempt into the (student, chapter) progress row.
    ///
    /// Read-modify-write runs under a bounded compare-and-swap loop, so two
    /// concurrent submissions both land in the counters; neither overwrites
    /// the other.
    pub fn record_chapter_attempt(
        &self,
        student_id: &str,
        chapter_id: &str,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<ChapterProgress, StoreError> {
        let key = keys::chapter_progress_key(student_id, chapter_id);

        for _ in 0..MAX_CAS_RETRIES {
            let current_raw = self.chapter_progress.get(key.as_bytes())?;

            let mut progress = match &current_raw {
                Some(raw) => Self::deserialize::<ChapterProgress>(raw)?,
                None => ChapterProgress::new(student_id, chapter_id, now),
            };
            tracker::apply_chapter_attempt(&mut progress, is_correct, now);

            let next_raw = Self::serialize(&progress)?;
            let swap = self.chapter_progress.compare_and_swap(
                key.as_bytes(),
                current_raw.as_ref(),
                Some(next_raw),
            )?;

            if swap.is_ok() {
                return Ok(progress);
            }
        }

        Err(StoreError::CasRetryExhausted {
            entity: "chapter_progress".to_string(),
            key,
            attempts: MAX_CAS_RETRIES,
        })
    }

    pub fn list_chapter_progress(
        &self,
        student_id: &str,
    ) -> Result<Vec<ChapterProgress>, StoreError> {
        let prefix = keys::chapter_progress_prefix(student_id);
        let mut rows = Vec::new();
        for item in self.chapter_progress.scan_prefix(prefix.as_bytes()) {
            let (_, v) = item?;
            rows.push(Self::deserialize::<ChapterProgress>(&v)?);
        }
        Ok(rows)
    }
}
