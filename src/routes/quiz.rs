use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::XP_PER_CORRECT;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::attempts::AttemptRecord;
use crate::store::operations::curriculum::{Question, QuestionContent};
use crate::validation::{validate_entity_id, validate_option_key};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/questions/:question_id", get(get_question))
        .route("/random/:concept_id", get(get_random_question))
        .route("/submit", post(submit_answer))
}

/// Question as served to students: the correct option key stays
/// server-side until the answer is graded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPublic {
    pub id: String,
    pub concept_id: String,
    pub content: QuestionContent,
    pub difficulty_level: u8,
    pub explanation: String,
}

impl From<Question> for QuestionPublic {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            concept_id: q.concept_id,
            content: q.content,
            difficulty_level: q.difficulty_level,
            explanation: q.explanation,
        }
    }
}

async fn get_question(
    Path(question_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let question = state
        .store()
        .get_question(&question_id)?
        .ok_or_else(|| AppError::not_found("Question not found"))?;
    Ok(ok(QuestionPublic::from(question)))
}

#[derive(Debug, Deserialize)]
struct RandomQuestionQuery {
    difficulty: Option<u8>,
}

async fn get_random_question(
    Path(concept_id): Path<String>,
    Query(q): Query<RandomQuestionQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let ids = state.store().list_question_ids_for_concept(&concept_id)?;

    let mut candidates = Vec::with_capacity(ids.len());
    for id in &ids {
        if let Some(question) = state.store().get_question(id)? {
            if q.difficulty.is_none() || q.difficulty == Some(question.difficulty_level) {
                candidates.push(question);
            }
        }
    }

    let picked = candidates
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| AppError::not_found("No questions found for this concept"))?;

    Ok(ok(QuestionPublic::from(picked)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitAnswerRequest {
    student_id: String,
    question_id: String,
    selected_option: String,
    time_taken_seconds: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitAnswerResponse {
    is_correct: bool,
    xp_earned: i64,
    explanation: String,
    concept_mastery_score: f64,
    concept_leitner_box: u8,
    chapter_mastery_score: f64,
    total_xp: i64,
    next_review_date: chrono::NaiveDate,
}

/// Grade one answer and fold it into the student's state: attempt record,
/// concept mastery (EMA + Leitner), chapter progress and XP, all committed
/// together by the store.
async fn submit_answer(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SubmitAnswerRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validate_entity_id(&req.student_id)
        .map_err(|msg| AppError::bad_request("INVALID_STUDENT_ID", msg))?;
    validate_entity_id(&req.question_id)
        .map_err(|msg| AppError::bad_request("INVALID_QUESTION_ID", msg))?;
    validate_option_key(&req.selected_option)
        .map_err(|msg| AppError::bad_request("INVALID_OPTION_KEY", msg))?;

    let question = state
        .store()
        .get_question(&req.question_id)?
        .ok_or_else(|| AppError::not_found("Question not found"))?;

    let chapter = state
        .store()
        .resolve_chapter_for_concept(&question.concept_id)?
        .ok_or_else(|| AppError::not_found("Chapter not found for concept"))?;

    let is_correct =
        req.selected_option.to_uppercase() == question.correct_option_key.to_uppercase();
    let xp_earned = if is_correct { XP_PER_CORRECT } else { 0 };

    let now = Utc::now();
    let attempt = AttemptRecord {
        id: uuid::Uuid::new_v4().to_string(),
        student_id: req.student_id.clone(),
        question_id: question.id.clone(),
        concept_id: question.concept_id.clone(),
        is_correct,
        selected_option: req.selected_option.to_uppercase(),
        time_taken_seconds: req.time_taken_seconds,
        xp_earned,
        attempted_at: now,
    };

    let outcome = state.store().record_submission(&attempt, &chapter.id, now)?;

    Ok(ok(SubmitAnswerResponse {
        is_correct,
        xp_earned,
        explanation: question.explanation,
        concept_mastery_score: outcome.mastery.mastery_score,
        concept_leitner_box: outcome.mastery.leitner_box,
        chapter_mastery_score: outcome.progress.mastery_score,
        total_xp: outcome.stats.total_xp,
        next_review_date: outcome.mastery.next_review_date,
    }))
}
