use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// Per-student XP and streak counters, created lazily on the first
/// submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub student_id: String,
    pub total_xp: i64,
    pub current_streak: u32,
    pub best_streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl StudentStats {
    pub fn new(student_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            student_id: student_id.to_string(),
            total_xp: 0,
            current_streak: 0,
            best_streak: 0,
            last_active_date: None,
            updated_at: now,
        }
    }

    /// Credit XP and roll the daily streak forward. Same-day activity
    /// leaves the streak; the day after extends it; any gap resets to 1.
    pub fn credit(&mut self, xp: i64, now: DateTime<Utc>) {
        let today = now.date_naive();
        self.total_xp += xp;
        match self.last_active_date {
            Some(last) if last == today => {}
            Some(last) if last + Duration::days(1) == today => {
                self.current_streak += 1;
            }
            _ => {
                self.current_streak = 1;
            }
        }
        self.best_streak = self.best_streak.max(self.current_streak);
        self.last_active_date = Some(today);
        self.updated_at = now;
    }
}

impl Store {
    pub fn get_student_stats(&self, student_id: &str) -> Result<Option<StudentStats>, StoreError> {
        let key = keys::student_stats_key(student_id);
        match (self.student_stats.get(key.as_bytes()))? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_student_stats(&self, stats: &StudentStats) -> Result<(), StoreError> {
        let key = keys::student_stats_key(&stats.student_id);
        self.student_stats
            .insert(key.as_bytes(), Self::serialize(stats)?)?;
        Ok(())
    }
}
