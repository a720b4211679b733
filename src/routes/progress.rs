use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DUE_LIMIT, DEFAULT_PAGE_SIZE, MAX_DUE_LIMIT, MAX_PAGE_SIZE};
use crate::response::{ok, paginated, AppError};
use crate::state::AppState;
use crate::store::operations::students::StudentStats;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students/:student_id", get(get_dashboard))
        .route("/students/:student_id/concepts", get(list_concept_mastery))
        .route(
            "/students/:student_id/concepts/:concept_id",
            get(get_concept_mastery),
        )
        .route("/students/:student_id/due", get(list_due_concepts))
        .route("/students/:student_id/attempts", get(list_attempts))
        .route("/students/:student_id/streak", get(get_streak))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChapterProgressView {
    chapter_id: String,
    name: String,
    mastery_score: f64,
    questions_completed: u64,
    questions_correct: u64,
    status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardResponse {
    student_id: String,
    total_xp: i64,
    current_streak: u32,
    best_streak: u32,
    chapters: Vec<ChapterProgressView>,
}

/// Chapter-level progress across everything the student has answered.
async fn get_dashboard(
    Path(student_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let stats = state
        .store()
        .get_student_stats(&student_id)?
        .unwrap_or_else(|| StudentStats::new(&student_id, Utc::now()));

    let mut chapters = Vec::new();
    for progress in state.store().list_chapter_progress(&student_id)? {
        let name = state
            .store()
            .get_chapter(&progress.chapter_id)?
            .map(|c| c.name)
            .unwrap_or_else(|| "Unknown".to_string());
        chapters.push(ChapterProgressView {
            chapter_id: progress.chapter_id,
            name,
            mastery_score: progress.mastery_score,
            questions_completed: progress.questions_completed,
            questions_correct: progress.questions_correct,
            status: if progress.mastery_score > 0.0 {
                "unlocked"
            } else {
                "locked"
            },
        });
    }

    Ok(ok(DashboardResponse {
        student_id,
        total_xp: stats.total_xp,
        current_streak: stats.current_streak,
        best_streak: stats.best_streak,
        chapters,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConceptMasteryView {
    concept_id: String,
    concept_name: String,
    mastery_score: f64,
    leitner_box: u8,
    next_review_date: Option<NaiveDate>,
    status: &'static str,
}

async fn list_concept_mastery(
    Path(student_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let mut concepts = Vec::new();

    for record in state.store().list_mastery_records(&student_id)? {
        let concept_name = state
            .store()
            .get_concept(&record.concept_id)?
            .map(|c| c.name)
            .unwrap_or_else(|| "Unknown".to_string());
        concepts.push(ConceptMasteryView {
            status: if record.is_due(today) {
                "review_needed"
            } else {
                "reviewing"
            },
            concept_id: record.concept_id,
            concept_name,
            mastery_score: record.mastery_score,
            leitner_box: record.leitner_box,
            next_review_date: Some(record.next_review_date),
        });
    }

    Ok(ok(concepts))
}

async fn get_concept_mastery(
    Path((student_id, concept_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let concept = state
        .store()
        .get_concept(&concept_id)?
        .ok_or_else(|| AppError::not_found("Concept not found"))?;

    let view = match state.store().get_mastery_record(&student_id, &concept_id)? {
        Some(record) => {
            let today = Utc::now().date_naive();
            ConceptMasteryView {
                status: if record.is_due(today) {
                    "review_needed"
                } else {
                    "mastered"
                },
                concept_id: record.concept_id,
                concept_name: concept.name,
                mastery_score: record.mastery_score,
                leitner_box: record.leitner_box,
                next_review_date: Some(record.next_review_date),
            }
        }
        None => ConceptMasteryView {
            concept_id,
            concept_name: concept.name,
            mastery_score: 0.0,
            leitner_box: 1,
            next_review_date: None,
            status: "not_started",
        },
    };

    Ok(ok(view))
}

#[derive(Debug, Deserialize)]
struct DueQuery {
    limit: Option<usize>,
}

/// Concepts due for review today, soonest first.
async fn list_due_concepts(
    Path(student_id): Path<String>,
    Query(q): Query<DueQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = q.limit.unwrap_or(DEFAULT_DUE_LIMIT).clamp(1, MAX_DUE_LIMIT);
    let today = Utc::now().date_naive();

    let due = state.store().list_due_concepts(&student_id, today, limit)?;

    let mut views = Vec::with_capacity(due.len());
    for record in due {
        let concept_name = state
            .store()
            .get_concept(&record.concept_id)?
            .map(|c| c.name)
            .unwrap_or_else(|| "Unknown".to_string());
        views.push(ConceptMasteryView {
            status: "review_needed",
            concept_id: record.concept_id,
            concept_name,
            mastery_score: record.mastery_score,
            leitner_box: record.leitner_box,
            next_review_date: Some(record.next_review_date),
        });
    }

    Ok(ok(views))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListAttemptsQuery {
    page: Option<u64>,
    per_page: Option<u64>,
}

async fn list_attempts(
    Path(student_id): Path<String>,
    Query(q): Query<ListAttemptsQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let page = q.page.unwrap_or(1).max(1);
    let per_page = q.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let limit = per_page as usize;
    let offset = ((page - 1) * per_page) as usize;

    let attempts = state.store().list_attempts(&student_id, limit, offset)?;
    let total = state.store().count_attempts(&student_id)?;
    Ok(paginated(attempts, total, page, per_page))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StreakResponse {
    student_id: String,
    current_streak: u32,
    best_streak: u32,
    total_xp: i64,
}

async fn get_streak(
    Path(student_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let stats = state
        .store()
        .get_student_stats(&student_id)?
        .unwrap_or_else(|| StudentStats::new(&student_id, Utc::now()));

    Ok(ok(StreakResponse {
        student_id,
        current_streak: stats.current_streak,
        best_streak: stats.best_streak,
        total_xp: stats.total_xp,
    }))
}
