use chrono::{DateTime, NaiveDate, Utc};
use sled::Transactional;

use crate::mastery::tracker::{self, MasteryRecord};
use crate::store::keys;
use crate::store::{Store, StoreError};

fn abort(error: StoreError) -> sled::transaction::ConflictableTransactionError<StoreError> {
    sled::transaction::ConflictableTransactionError::Abort(error)
}

fn unwrap_transaction_error(
    error: sled::transaction::TransactionError<StoreError>,
) -> StoreError {
    match error {
        sled::transaction::TransactionError::Abort(store_error) => store_error,
        sled::transaction::TransactionError::Storage(storage_error) => {
            StoreError::Sled(storage_error)
        }
    }
}

impl Store {
    pub fn get_mastery_record(
        &self,
        student_id: &str,
        concept_id: &str,
    ) -> Result<Option<MasteryRecord>, StoreError> {
        let key = keys::mastery_record_key(student_id, concept_id);
        match self.mastery_records.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Score one attempt into the (student, concept) mastery record.
    ///
    /// Fetch-or-init, EMA + Leitner application and the due-index move all
    /// happen inside one sled transaction, so concurrent attempts on the
    /// same key serialize instead of losing updates. The first attempt is
    /// scored against the box-1/score-0.0 baseline.
    pub fn record_attempt(
        &self,
        student_id: &str,
        concept_id: &str,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<MasteryRecord, StoreError> {
        let key = keys::mastery_record_key(student_id, concept_id);

        (&self.mastery_records, &self.mastery_due_index)
            .transaction(|(tx_records, tx_due_index)| {
                let mut record = match tx_records.get(key.as_bytes())? {
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

                tracker::apply_attempt(&mut record, is_correct, now);

                let bytes = serde_json::to_vec(&record).map_err(|e| abort(e.into()))?;
                tx_records.insert(key.as_bytes(), bytes)?;

                let due_key =
                    keys::mastery_due_index_key(student_id, record.next_review_date, concept_id);
                tx_due_index.insert(due_key.as_bytes(), &[])?;

                Ok(record)
            })
            .map_err(unwrap_transaction_error)
    }

    pub fn list_mastery_records(&self, student_id: &str) -> Result<Vec<MasteryRecord>, StoreError> {
        let prefix = keys::mastery_record_prefix(student_id);
        let mut records = Vec::new();
        for item in self.mastery_records.scan_prefix(prefix.as_bytes()) {
            let (_, v) = item?;
            records.push(Self::deserialize::<MasteryRecord>(&v)?);
        }
        Ok(records)
    }

    /// Concepts due for review on or before `today`, in due-date order.
    pub fn list_due_concepts(
        &self,
        student_id: &str,
        today: NaiveDate,
        limit: usize,
    ) -> Result<Vec<MasteryRecord>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let prefix = keys::mastery_due_index_prefix(student_id);
        let mut due = Vec::with_capacity(limit);

        for item in self.mastery_due_index.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            let Some((due_date, concept_id)) = keys::parse_due_index_item_key(&key) else {
                continue;
            };

            if due_date > today {
                break;
            }

            // Skip stale index entries left behind by interrupted writes;
            // the record itself is the source of truth.
            if let Some(record) = self.get_mastery_record(student_id, &concept_id)? {
                if record.next_review_date == due_date {
                    due.push(record);
                    if due.len() >= limit {
                        break;
                    }
                }
            }
        }

        Ok(due)
    }
}
