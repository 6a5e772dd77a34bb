mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn catalog_and_registry_are_creator_scoped() {
    if !common::setup_env() {
        return;
    }
    let (app, pool) = common::test_app().await;

    let token_a = common::register_user(&app, "owner").await;
    let token_b = common::register_user(&app, "intruder").await;

    // Missing required field.
    let (status, body) = common::request(
        &app,
        "POST",
        "/exams",
        Some(&token_a),
        Some(json!({ "title": "No score", "duration_minutes": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: passing_score");

    // Create an exam as A.
    let (status, body) = common::request(
        &app,
        "POST",
        "/exams",
        Some(&token_a),
        Some(json!({
            "title": "Rust Basics",
            "description": "Ownership and borrowing",
            "duration_minutes": 60,
            "passing_score": 50,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let exam_id = body["exam"]["id"].as_str().unwrap().to_string();

    // B cannot see, edit or delete it; absence and foreign ownership
    // look identical.
    for method in ["GET", "DELETE"] {
        let (status, _) = common::request(
            &app,
            method,
            &format!("/exams/{}", exam_id),
            Some(&token_b),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    let (status, _) = common::request(
        &app,
        "PUT",
        &format!("/exams/{}", exam_id),
        Some(&token_b),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Partial update as A.
    let (status, body) = common::request(
        &app,
        "PUT",
        &format!("/exams/{}", exam_id),
        Some(&token_a),
        Some(json!({ "passing_score": 60, "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exam"]["passing_score"], 60);
    assert_eq!(body["exam"]["is_active"], false);
    assert_eq!(body["exam"]["title"], "Rust Basics");

    // B cannot attach questions to A's exam.
    let (status, _) = common::request(
        &app,
        "POST",
        "/questions",
        Some(&token_b),
        Some(json!({
            "exam_id": exam_id,
            "text": "Planted?",
            "question_type": "open_ended",
            "points": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A creates a multiple-choice question with options.
    let (status, body) = common::request(
        &app,
        "POST",
        "/questions",
        Some(&token_a),
        Some(json!({
            "exam_id": exam_id,
            "text": "What moves ownership?",
            "question_type": "multiple_choice",
            "points": 10,
            "order": 1,
            "options": [
                { "text": "Assignment", "is_correct": true, "order": 1 },
                { "text": "Borrowing", "order": 2 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let question_id = body["question"]["id"].as_str().unwrap().to_string();
    let first_option_id = body["question"]["options"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(body["question"]["options"].as_array().unwrap().len(), 2);

    // Creator view keeps the answer key.
    let (status, body) = common::request(
        &app,
        "GET",
        &format!("/exams/{}/questions", exam_id),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["options"][0]["is_correct"], true);

    // Updating with options replaces the whole set.
    let (status, body) = common::request(
        &app,
        "PUT",
        &format!("/questions/{}", question_id),
        Some(&token_a),
        Some(json!({
            "options": [
                { "text": "A move", "is_correct": true, "order": 1 },
                { "text": "A copy", "order": 2 },
                { "text": "A borrow", "order": 3 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let options = body["question"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 3);
    assert!(options
        .iter()
        .all(|o| o["id"].as_str().unwrap() != first_option_id));

    // Candidates: creation is scoped through the exam.
    let (status, _) = common::request(
        &app,
        "POST",
        "/candidates",
        Some(&token_b),
        Some(json!({ "name": "Mallory", "email": "mallory@example.com", "exam_id": exam_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = common::request(
        &app,
        "POST",
        "/candidates",
        Some(&token_a),
        Some(json!({ "name": "Alice", "email": "alice@example.com", "exam_id": exam_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let candidate_id = body["candidate"]["id"].as_str().unwrap().to_string();
    let unique_link = body["candidate"]["unique_link"].as_str().unwrap().to_string();
    assert_eq!(unique_link.len(), 32);

    // A second candidate gets a different link.
    let (_, body) = common::request(
        &app,
        "POST",
        "/candidates",
        Some(&token_a),
        Some(json!({ "name": "Bob", "email": "bob@example.com", "exam_id": exam_id })),
    )
    .await;
    assert_ne!(body["candidate"]["unique_link"], unique_link.as_str());

    let (status, body) = common::request(
        &app,
        "GET",
        &format!("/exams/{}/candidates", exam_id),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // B sees nothing of A's candidates.
    let (status, _) = common::request(
        &app,
        "GET",
        &format!("/candidates/{}", candidate_id),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Rename via partial update.
    let (status, body) = common::request(
        &app,
        "PUT",
        &format!("/candidates/{}", candidate_id),
        Some(&token_a),
        Some(json!({ "name": "Alice Cooper" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["candidate"]["name"], "Alice Cooper");
    assert_eq!(body["candidate"]["unique_link"], unique_link.as_str());

    // Invitations: non-owner gets 404, owner gets a queued mail and the
    // invited flags set.
    let (status, _) = common::request(
        &app,
        "POST",
        &format!("/candidates/{}/send-invitation", candidate_id),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = common::request(
        &app,
        "POST",
        &format!("/candidates/{}/send-invitation", candidate_id),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["candidate"]["invitation_sent"], true);
    assert!(body["candidate"]["last_invited_at"].is_string());
    let access_link = body["access_link"].as_str().unwrap();
    assert!(access_link.ends_with(&format!("/exam/{}", unique_link)));

    let queued: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM invitation_outbox WHERE payload->>'access_link' = $1",
    )
    .bind(access_link)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(queued, 1);

    // Results need a submission; run the public flow for Alice.
    let (status, _) = common::request(
        &app,
        "POST",
        &format!("/exams/submit/{}", unique_link),
        None,
        Some(json!({ "answers": [ { "question_id": question_id } ] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::request(
        &app,
        "GET",
        &format!("/exams/{}/results", exam_id),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let result_id = body[0]["id"].as_str().unwrap().to_string();

    let (status, _) = common::request(
        &app,
        "GET",
        &format!("/exams/{}/results", exam_id),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::request(
        &app,
        "GET",
        &format!("/results/{}", result_id),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Export is an interface point only.
    let (status, body) = common::request(
        &app,
        "GET",
        &format!("/results/{}/export", result_id),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert!(body["error"].is_string());

    // Deleting the exam takes questions, candidates and results along.
    let (status, _) = common::request(
        &app,
        "DELETE",
        &format!("/exams/{}", exam_id),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates WHERE exam_id = $1::uuid")
        .bind(&exam_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    let (status, _) = common::request(
        &app,
        "GET",
        &format!("/questions/{}", question_id),
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
