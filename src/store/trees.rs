pub const CHAPTERS: &str = "chapters";
pub const TOPICS: &str = "topics";
pub const CONCEPTS: &str = "concepts";
pub const QUESTIONS: &str = "questions";
pub const MASTERY_RECORDS: &str = "mastery_records";
pub const MASTERY_DUE_INDEX: &str = "mastery_due_index";
pub const CHAPTER_PROGRESS: &str = "chapter_progress";
pub const ATTEMPTS: &str = "attempts";
pub const STUDENT_STATS: &str = "student_stats";
pub const DAILY_ANALYTICS: &str = "daily_analytics";
pub const META: &str = "meta";

// Secondary index trees
pub const QUESTIONS_BY_CONCEPT: &str = "questions_by_concept";
