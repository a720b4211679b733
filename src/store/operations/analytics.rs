use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::operations::attempts::AttemptRecord;
use crate::store::{Store, StoreError};

/// One student's activity rollup for one UTC day. Recomputed by the daily
/// aggregation worker from the attempts tree; upserts are idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAnalytics {
    pub student_id: String,
    pub date: NaiveDate,
    pub questions_answered: u64,
    pub questions_correct: u64,
    pub xp_earned: i64,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn get_daily_analytics(
        &self,
        student_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyAnalytics>, StoreError> {
        let key = keys::daily_analytics_key(student_id, date);
        match self.daily_analytics.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn upsert_daily_analytics(&self, row: &DailyAnalytics) -> Result<(), StoreError> {
        let key = keys::daily_analytics_key(&row.student_id, row.date);
        self.daily_analytics
            .insert(key.as_bytes(), Self::serialize(row)?)?;
        Ok(())
    }

    /// Recompute per-student rollups for one day by scanning the attempts
    /// tree. Returns the number of students touched.
    pub fn aggregate_daily_analytics(
        &self,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let mut rollups: HashMap<String, DailyAnalytics> = HashMap::new();

        for item in self.attempts.iter() {
            let (_, v) = item?;
            let attempt: AttemptRecord = Self::deserialize(&v)?;
            if attempt.attempted_on() != date {
                continue;
            }

            let row = rollups
                .entry(attempt.student_id.clone())
                .or_insert_with(|| DailyAnalytics {
                    student_id: attempt.student_id.clone(),
                    date,
                    questions_answered: 0,
                    questions_correct: 0,
                    xp_earned: 0,
                    updated_at: now,
                });
            row.questions_answered += 1;
            if attempt.is_correct {
                row.questions_correct += 1;
            }
            row.xp_earned += attempt.xp_earned;
        }

        for row in rollups.values() {
            self.upsert_daily_analytics(row)?;
        }

        Ok(rollups.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::store::Store;

    use super::*;

    fn mock_attempt(student_id: &str, id: &str, is_correct: bool, at: DateTime<Utc>) -> AttemptRecord {
        AttemptRecord {
            id: id.to_string(),
            student_id: student_id.to_string(),
            question_id: "q1".to_string(),
            concept_id: "c1".to_string(),
            is_correct,
            selected_option: "A".to_string(),
            time_taken_seconds: None,
            xp_earned: if is_correct { 10 } else { 0 },
            attempted_at: at,
        }
    }

    #[test]
    fn aggregation_rolls_up_one_day_per_student() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let day = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();

        store.create_attempt(&mock_attempt("s1", "a1", true, day)).unwrap();
        store.create_attempt(&mock_attempt("s1", "a2", false, day)).unwrap();
        store.create_attempt(&mock_attempt("s2", "a3", true, day)).unwrap();
        // Different day, must not be counted.
        store
            .create_attempt(&mock_attempt("s1", "a4", true, day + Duration::days(1)))
            .unwrap();

        let touched = store
            .aggregate_daily_analytics(day.date_naive(), day)
            .unwrap();
        assert_eq!(touched, 2);

        let s1 = store
            .get_daily_analytics("s1", day.date_naive())
            .unwrap()
            .unwrap();
        assert_eq!(s1.questions_answered, 2);
        assert_eq!(s1.questions_correct, 1);
        assert_eq!(s1.xp_earned, 10);

        let s2 = store
            .get_daily_analytics("s2", day.date_naive())
            .unwrap()
            .unwrap();
        assert_eq!(s2.questions_answered, 1);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db2").to_str().unwrap()).unwrap();
        let day = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();

        store.create_attempt(&mock_attempt("s1", "a1", true, day)).unwrap();

        store.aggregate_daily_analytics(day.date_naive(), day).unwrap();
        store.aggregate_daily_analytics(day.date_naive(), day).unwrap();

        let s1 = store
            .get_daily_analytics("s1", day.date_naive())
            .unwrap()
            .unwrap();
        assert_eq!(s1.questions_answered, 1);
    }
}
