use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn chapter_key(chapter_id: &str) -> String {
    chapter_id.to_string()
}

pub fn topic_key(topic_id: &str) -> String {
    topic_id.to_string()
}

pub fn concept_key(concept_id: &str) -> String {
    concept_id.to_string()
}

pub fn question_key(question_id: &str) -> String {
    question_id.to_string()
}

pub fn question_concept_index_key(concept_id: &str, question_id: &str) -> String {
    format!("{}:{}", concept_id, question_id)
}

pub fn question_concept_index_prefix(concept_id: &str) -> String {
    format!("{}:", concept_id)
}

pub fn mastery_record_key(student_id: &str, concept_id: &str) -> String {
    format!("{}:{}", student_id, concept_id)
}

pub fn mastery_record_prefix(student_id: &str) -> String {
    format!("{}:", student_id)
}

// ISO dates sort lexicographically, so a prefix scan walks records in
// due-date order without decoding values.
pub fn mastery_due_index_key(student_id: &str, due_date: NaiveDate, concept_id: &str) -> String {
    format!(
        "{}:{}:{}",
        student_id,
        due_date.format(DATE_FORMAT),
        concept_id
    )
}

pub fn mastery_due_index_prefix(student_id: &str) -> String {
    format!("{}:", student_id)
}

/// Parse `(due_date, concept_id)` back out of a due-index key.
pub fn parse_due_index_item_key(key: &[u8]) -> Option<(NaiveDate, String)> {
    let text = std::str::from_utf8(key).ok()?;
    let mut parts = text.splitn(3, ':');
    let _student_id = parts.next()?;
    let date = NaiveDate::parse_from_str(parts.next()?, DATE_FORMAT).ok()?;
    let concept_id = parts.next()?;
    Some((date, concept_id.to_string()))
}

pub fn chapter_progress_key(student_id: &str, chapter_id: &str) -> String {
    format!("{}:{}", student_id, chapter_id)
}

pub fn chapter_progress_prefix(student_id: &str) -> String {
    format!("{}:", student_id)
}

pub fn attempt_key(student_id: &str, timestamp_ms: i64, attempt_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{}:{:020}:{}", student_id, reverse_ts, attempt_id)
}

pub fn attempt_prefix(student_id: &str) -> String {
    format!("{}:", student_id)
}

pub fn student_stats_key(student_id: &str) -> String {
    student_id.to_string()
}

pub fn daily_analytics_key(student_id: &str, date: NaiveDate) -> String {
    format!("{}:{}", student_id, date.format(DATE_FORMAT))
}

pub fn daily_analytics_prefix(student_id: &str) -> String {
    format!("{}:", student_id)
}
