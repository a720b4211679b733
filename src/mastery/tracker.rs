use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::LEITNER_BOX_MIN;

use super::{ema, leitner};

/// Per-(student, concept) spaced-repetition state. One record per pair,
/// created lazily on the first attempt and mutated on every attempt after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryRecord {
    pub student_id: String,
    pub concept_id: String,
    /// EMA-smoothed confidence in [0, 1], rounded to 3 decimals.
    pub mastery_score: f64,
    /// Leitner box in {1, 2, 3, 4}.
    pub leitner_box: u8,
    /// The concept is due for review when today >= this date.
    pub next_review_date: NaiveDate,
    pub last_practiced_at: DateTime<Utc>,
}

impl MasteryRecord {
    /// Baseline state the very first attempt is scored against:
    /// box 1, score 0.0, review due today.
    pub fn new(student_id: &str, concept_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            student_id: student_id.to_string(),
            concept_id: concept_id.to_string(),
            mastery_score: 0.0,
            leitner_box: LEITNER_BOX_MIN,
            next_review_date: now.date_naive(),
            last_practiced_at: now,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        today >= self.next_review_date
    }
}

/// Per-(student, chapter) completion/accuracy rollup. Counters only go up;
/// the score is recomputed from the counters on every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterProgress {
    pub student_id: String,
    pub chapter_id: String,
    pub questions_completed: u64,
    pub questions_correct: u64,
    /// 100 * correct / completed, in [0, 100].
    pub mastery_score: f64,
    pub last_answered_at: DateTime<Utc>,
}

impl ChapterProgress {
    pub fn new(student_id: &str, chapter_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            student_id: student_id.to_string(),
            chapter_id: chapter_id.to_string(),
            questions_completed: 0,
            questions_correct: 0,
            mastery_score: 0.0,
            last_answered_at: now,
        }
    }
}

/// Score one attempt into a mastery record: EMA first, then the Leitner
/// move, then the review date recomputed from the NEW box. `now` is
/// injected so scheduling stays deterministic under test.
pub fn apply_attempt(record: &mut MasteryRecord, is_correct: bool, now: DateTime<Utc>) {
    record.mastery_score = ema::update_score_default(record.mastery_score, is_correct);
    record.leitner_box = leitner::advance_box(record.leitner_box, is_correct);
    record.next_review_date = leitner::next_review_date(record.leitner_box, now.date_naive());
    record.last_practiced_at = now;
}

/// Roll one attempt into chapter progress. The completed counter is
/// incremented before the division, so the ratio is never 0/0.
pub fn apply_chapter_attempt(progress: &mut ChapterProgress, is_correct: bool, now: DateTime<Utc>) {
    progress.questions_completed += 1;
    if is_correct {
        progress.questions_correct += 1;
    }
    progress.mastery_score =
        100.0 * progress.questions_correct as f64 / progress.questions_completed as f64;
    progress.last_answered_at = now;
}
