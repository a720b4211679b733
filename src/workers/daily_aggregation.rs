//! Daily analytics aggregation (1:00 AM UTC).
//!
//! Recomputes per-student activity rollups for the previous UTC day from
//! the attempts tree. The run is a full recompute, so repeating it (after a
//! crash or a manual trigger) converges to the same rows.

use chrono::{Duration, Utc};

use crate::store::Store;

pub async fn run(store: &Store) {
    let now = Utc::now();
    let target_date = now.date_naive() - Duration::days(1);

    tracing::info!(date = %target_date, "Daily aggregation worker running");

    match store.aggregate_daily_analytics(target_date, now) {
        Ok(students) => {
            tracing::info!(
                date = %target_date,
                students,
                "Daily aggregation complete"
            );
        }
        Err(e) => {
            tracing::warn!(date = %target_date, error = %e, "Daily aggregation failed");
        }
    }
}
