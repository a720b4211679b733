pub mod analytics;
pub mod attempts;
pub mod curriculum;
pub mod mastery;
pub mod progress;
pub mod students;
pub mod submissions;
