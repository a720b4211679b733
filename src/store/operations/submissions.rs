use chrono::{DateTime, Utc};
use sled::Transactional;

use crate::mastery::tracker::{self, ChapterProgress, MasteryRecord};
use crate::store::keys;
use crate::store::operations::attempts::AttemptRecord;
use crate::store::operations::students::StudentStats;
use crate::store::{Store, StoreError};

/// Everything one graded submission touches, as written.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub attempt: AttemptRecord,
    pub mastery: MasteryRecord,
    pub progress: ChapterProgress,
    pub stats: StudentStats,
}

fn abort(error: StoreError) -> sled::transaction::ConflictableTransactionError<StoreError> {
    sled::transaction::ConflictableTransactionError::Abort(error)
}

impl Store {
    /// Persist one graded submission in a single sled transaction: the
    /// attempt row, the concept mastery update (with its due-index move),
    /// the chapter progress rollup and the XP/streak credit.
    ///
    /// All five trees commit together or not at all, so a crash or
    /// conflict mid-update can never leave XP credited without mastery
    /// updated (or vice versa). Reads happen inside the transaction;
    /// conflicting concurrent submissions re-run instead of losing
    /// updates.
    pub fn record_submission(
        &self,
        attempt: &AttemptRecord,
        chapter_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, StoreError> {
        let student_id = &attempt.student_id;
        let concept_id = &attempt.concept_id;
        let is_correct = attempt.is_correct;

        let attempt_key = keys::attempt_key(student_id, now.timestamp_millis(), &attempt.id);
        let attempt_bytes = Self::serialize(attempt)?;
        let mastery_key = keys::mastery_record_key(student_id, concept_id);
        let progress_key = keys::chapter_progress_key(student_id, chapter_id);
        let stats_key = keys::student_stats_key(student_id);

        (
            &self.attempts,
            &self.mastery_records,
            &self.mastery_due_index,
            &self.chapter_progress,
            &self.student_stats,
        )
            .transaction(
                |(tx_attempts, tx_mastery, tx_due_index, tx_progress, tx_stats)| {
                    tx_attempts.insert(attempt_key.as_bytes(), attempt_bytes.as_slice())?;

                    // Concept mastery: fetch-or-init, score, move due index.
                    let mut mastery = match tx_mastery.get(mastery_key.as_bytes())? {
                        Some(raw) => {
                            let existing: MasteryRecord =
                                serde_json::from_slice(&raw).map_err(|e| abort(e.into()))?;
                            let old_due_key = keys::mastery_due_index_key(
                                student_id,
                                existing.next_review_date,
                                concept_id,
                            );
                            tx_due_index.remove(old_due_key.as_bytes())?;
                            existing
                        }
                        None => MasteryRecord::new(student_id, concept_id, now),
                    };
                    tracker::apply_attempt(&mut mastery, is_correct, now);
                    let mastery_bytes =
                        serde_json::to_vec(&mastery).map_err(|e| abort(e.into()))?;
                    tx_mastery.insert(mastery_key.as_bytes(), mastery_bytes)?;
                    let due_key = keys::mastery_due_index_key(
                        student_id,
                        mastery.next_review_date,
                        concept_id,
                    );
                    tx_due_index.insert(due_key.as_bytes(), &[])?;

                    // Chapter progress rollup.
                    let mut progress = match tx_progress.get(progress_key.as_bytes())? {
                        Some(raw) => {
                            serde_json::from_slice::<ChapterProgress>(&raw)
                                .map_err(|e| abort(e.into()))?
                        }
                        None => ChapterProgress::new(student_id, chapter_id, now),
                    };
                    tracker::apply_chapter_attempt(&mut progress, is_correct, now);
                    let progress_bytes =
                        serde_json::to_vec(&progress).map_err(|e| abort(e.into()))?;
                    tx_progress.insert(progress_key.as_bytes(), progress_bytes)?;

                    // XP and streak credit.
                    let mut stats = match tx_stats.get(stats_key.as_bytes())? {
                        Some(raw) => serde_json::from_slice::<StudentStats>(&raw)
                            .map_err(|e| abort(e.into()))?,
                        None => StudentStats::new(student_id, now),
                    };
                    stats.credit(attempt.xp_earned, now);
                    let stats_bytes = serde_json::to_vec(&stats).map_err(|e| abort(e.into()))?;
                    tx_stats.insert(stats_key.as_bytes(), stats_bytes)?;

                    Ok(SubmissionOutcome {
                        attempt: attempt.clone(),
                        mastery,
                        progress,
                        stats,
                    })
                },
            )
            .map_err(
                |error: sled::transaction::TransactionError<StoreError>| match error {
                    sled::transaction::TransactionError::Abort(store_error) => store_error,
                    sled::transaction::TransactionError::Storage(storage_error) => {
                        StoreError::Sled(storage_error)
                    }
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::store::Store;

    use super::*;

    fn mock_attempt(id: &str, is_correct: bool, at: chrono::DateTime<Utc>) -> AttemptRecord {
        AttemptRecord {
            id: id.to_string(),
            student_id: "s1".to_string(),
            question_id: "q1".to_string(),
            concept_id: "c1".to_string(),
            is_correct,
            selected_option: if is_correct { "A" } else { "B" }.to_string(),
            time_taken_seconds: Some(20),
            xp_earned: if is_correct { 10 } else { 0 },
            attempted_at: at,
        }
    }

    #[test]
    fn submission_writes_all_five_trees_together() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

        let outcome = store
            .record_submission(&mock_attempt("a1", true, now), "ch1", now)
            .unwrap();

        assert_eq!(outcome.mastery.mastery_score, 0.3);
        assert_eq!(outcome.mastery.leitner_box, 2);
        assert_eq!(outcome.progress.mastery_score, 100.0);
        assert_eq!(outcome.stats.total_xp, 10);

        assert_eq!(store.count_attempts("s1").unwrap(), 1);
        assert!(store.get_mastery_record("s1", "c1").unwrap().is_some());
        assert!(store.get_chapter_progress("s1", "ch1").unwrap().is_some());
        assert!(store.get_student_stats("s1").unwrap().is_some());
        assert_eq!(store.mastery_due_index.len(), 1);
    }

    #[test]
    fn consecutive_submissions_accumulate() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db2").to_str().unwrap()).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

        store
            .record_submission(&mock_attempt("a1", true, now), "ch1", now)
            .unwrap();
        let later = now + Duration::minutes(1);
        let outcome = store
            .record_submission(&mock_attempt("a2", false, later), "ch1", later)
            .unwrap();

        // 0.3 then a miss: 0.7 * 0.3 = 0.21, box back to 1.
        assert_eq!(outcome.mastery.mastery_score, 0.21);
        assert_eq!(outcome.mastery.leitner_box, 1);
        assert_eq!(outcome.progress.questions_completed, 2);
        assert_eq!(outcome.progress.questions_correct, 1);
        assert_eq!(outcome.progress.mastery_score, 50.0);
        assert_eq!(outcome.stats.total_xp, 10);

        // The due index never duplicates entries for one concept.
        assert_eq!(store.mastery_due_index.len(), 1);
    }

    #[test]
    fn matches_standalone_core_operations() {
        let dir = tempdir().unwrap();
        let combined = Store::open(dir.path().join("db3a").to_str().unwrap()).unwrap();
        let split = Store::open(dir.path().join("db3b").to_str().unwrap()).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

        let outcome = combined
            .record_submission(&mock_attempt("a1", true, now), "ch1", now)
            .unwrap();

        let mastery = split.record_attempt("s1", "c1", true, now).unwrap();
        let progress = split.record_chapter_attempt("s1", "ch1", true, now).unwrap();

        assert_eq!(outcome.mastery, mastery);
        assert_eq!(outcome.progress, progress);
    }
}
