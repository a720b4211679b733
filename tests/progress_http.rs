mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_server;
use common::fixtures::{seed_curriculum, submit_body};
use common::http::{assert_json_error, assert_status_ok_json, request, response_json};

async fn submit(app: &common::app::TestApp, student: &str, question: &str, option: &str) {
    let resp = request(
        &app.app,
        Method::POST,
        "/api/quiz/submit",
        Some(submit_body(student, question, option)),
        &[],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn it_dashboard_aggregates_chapter_progress() {
    let app = spawn_test_server().await;
    seed_curriculum(app.state.store(), 3);

    submit(&app, "stu-1", "q-0", "A").await;
    submit(&app, "stu-1", "q-1", "B").await;

    let resp = request(&app.app, Method::GET, "/api/progress/students/stu-1", None, &[]).await;
    let (status, _, body) = response_json(resp).await;

    assert_status_ok_json(status, &body);
    let data = &body["data"];
    assert_eq!(data["studentId"], "stu-1");
    assert_eq!(data["totalXp"], 10);
    assert_eq!(data["currentStreak"], 1);

    let chapters = data["chapters"].as_array().unwrap();
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0]["chapterId"], "ch-algebra");
    assert_eq!(chapters[0]["name"], "Algebra Basics");
    assert_eq!(chapters[0]["questionsCompleted"], 2);
    assert_eq!(chapters[0]["questionsCorrect"], 1);
    assert_eq!(chapters[0]["masteryScore"], 50.0);
    assert_eq!(chapters[0]["status"], "unlocked");
}

#[tokio::test]
async fn it_dashboard_for_new_student_is_empty() {
    let app = spawn_test_server().await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/progress/students/fresh-student",
        None,
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;

    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["totalXp"], 0);
    assert!(body["data"]["chapters"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn it_concept_mastery_listing_reflects_attempts() {
    let app = spawn_test_server().await;
    seed_curriculum(app.state.store(), 2);

    submit(&app, "stu-1", "q-0", "A").await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/progress/students/stu-1/concepts",
        None,
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;

    assert_status_ok_json(status, &body);
    let concepts = body["data"].as_array().unwrap();
    assert_eq!(concepts.len(), 1);
    assert_eq!(concepts[0]["conceptId"], "c-solve-x");
    assert_eq!(concepts[0]["conceptName"], "Solving for x");
    assert_eq!(concepts[0]["masteryScore"], 0.3);
    assert_eq!(concepts[0]["leitnerBox"], 2);
    // Box 2 schedules three days out, so nothing is due yet.
    assert_eq!(concepts[0]["status"], "reviewing");
}

#[tokio::test]
async fn it_single_concept_mastery_defaults_to_not_started() {
    let app = spawn_test_server().await;
    seed_curriculum(app.state.store(), 1);

    let resp = request(
        &app.app,
        Method::GET,
        "/api/progress/students/stu-1/concepts/c-solve-x",
        None,
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;

    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["status"], "not_started");
    assert_eq!(body["data"]["masteryScore"], 0.0);
    assert_eq!(body["data"]["leitnerBox"], 1);
    assert!(body["data"]["nextReviewDate"].is_null());
}

#[tokio::test]
async fn it_single_concept_mastery_unknown_concept_is_404() {
    let app = spawn_test_server().await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/progress/students/stu-1/concepts/ghost",
        None,
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "NOT_FOUND");
}

#[tokio::test]
async fn it_due_list_shows_missed_concepts() {
    let app = spawn_test_server().await;
    seed_curriculum(app.state.store(), 1);

    // A miss drops the concept to box 1: due tomorrow, not today.
    submit(&app, "stu-1", "q-0", "B").await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/progress/students/stu-1/due",
        None,
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;

    assert_status_ok_json(status, &body);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn it_attempt_history_is_paginated_newest_first() {
    let app = spawn_test_server().await;
    seed_curriculum(app.state.store(), 3);

    submit(&app, "stu-1", "q-0", "A").await;
    submit(&app, "stu-1", "q-1", "B").await;
    submit(&app, "stu-1", "q-2", "A").await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/progress/students/stu-1/attempts?page=1&perPage=2",
        None,
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;

    assert_status_ok_json(status, &body);
    let page = &body["data"];
    assert_eq!(page["total"], 3);
    assert_eq!(page["perPage"], 2);
    assert_eq!(page["totalPages"], 2);

    let attempts = page["data"].as_array().unwrap();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0]["questionId"], "q-2");
    assert_eq!(attempts[1]["questionId"], "q-1");
}

#[tokio::test]
async fn it_streak_endpoint_returns_stats() {
    let app = spawn_test_server().await;
    seed_curriculum(app.state.store(), 1);

    submit(&app, "stu-1", "q-0", "A").await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/progress/students/stu-1/streak",
        None,
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;

    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["currentStreak"], 1);
    assert_eq!(body["data"]["bestStreak"], 1);
    assert_eq!(body["data"]["totalXp"], 10);
}

#[tokio::test]
async fn it_students_do_not_see_each_other() {
    let app = spawn_test_server().await;
    seed_curriculum(app.state.store(), 1);

    submit(&app, "stu-1", "q-0", "A").await;

    let resp = request(
        &app.app,
        Method::GET,
        "/api/progress/students/stu-2/concepts",
        None,
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;

    assert_status_ok_json(status, &body);
    assert!(body["data"].as_array().unwrap().is_empty());
}
