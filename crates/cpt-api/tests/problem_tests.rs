use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use crate::common::{
    self,
    jwt::create_test_token,
    test_data::{unique_email, unique_name},
};

#[tokio::test]
async fn test_toggle_note_and_dashboard() {
    let (state, client) = common::setup().await;
    let email = unique_email("toggle");
    let user_id = common::db::create_user(&state.pool, &email, "Toggler")
        .await
        .expect("Failed to create test user");
    let token = create_test_token(user_id, &email, &state.auth.jwt_secret);

    let plan: Value = client
        .post_json_with_auth("/study-plan", &json!({ "level": "intermediate", "days": 4 }), &token)
        .await
        .json();
    let first = &plan[0]["problems"][0];
    let problem_id = first["id"].as_str().unwrap().to_string();

    let response = client
        .patch_with_auth(&format!("/problems/{problem_id}/status"), &token)
        .await;
    response.assert_status(StatusCode::OK);
    let summary: Value = response.json();
    assert_eq!(summary["status"], "completed");
    assert_eq!(summary["id"], problem_id.as_str());

    let response = client
        .put_json_with_auth(
            &format!("/problems/{problem_id}/notes"),
            &json!({ "note": "monotonic stack" }),
            &token,
        )
        .await;
    response.assert_status(StatusCode::OK);
    let summary: Value = response.json();
    assert_eq!(summary["notes"], "monotonic stack");
    assert_eq!(summary["status"], "completed");

    let response = client.get_with_auth("/problems/dashboard-stats", &token).await;
    response.assert_status(StatusCode::OK);
    let stats: Value = response.json();
    assert_eq!(stats["total"], 12);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["percentage"], 8);
    let reviews = stats["spacedRepetition"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["problemId"], problem_id.as_str());
    assert_eq!(reviews[0]["repetitions"], 1);
    assert_eq!(
        reviews[0]["nextReviewDate"],
        (Utc::now().date_naive() + Duration::days(1)).to_string()
    );

    // Un-completing drops the review
    let response = client
        .patch_with_auth(&format!("/problems/{problem_id}/status"), &token)
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "pending");

    let stats: Value = client
        .get_with_auth("/problems/dashboard-stats", &token)
        .await
        .json();
    assert_eq!(stats["completed"], 0);
    assert!(stats["spacedRepetition"].as_array().unwrap().is_empty());

    common::db::delete_user_by_email(&state.pool, &email)
        .await
        .expect("Failed to cleanup database");
}

#[tokio::test]
async fn test_toggle_unassigned_problem_is_not_found() {
    let (state, client) = common::setup().await;
    let email = unique_email("stranger");
    let user_id = common::db::create_user(&state.pool, &email, "Stranger")
        .await
        .expect("Failed to create test user");
    let token = create_test_token(user_id, &email, &state.auth.jwt_secret);

    let response = client
        .patch_with_auth(&format!("/problems/{}/status", uuid::Uuid::new_v4()), &token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.json::<Value>()["error"].is_string());

    let stats: Value = client
        .get_with_auth("/problems/dashboard-stats", &token)
        .await
        .json();
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["percentage"], 0);

    common::db::delete_user_by_email(&state.pool, &email)
        .await
        .expect("Failed to cleanup database");
}

#[tokio::test]
async fn test_custom_problem() {
    let (state, client) = common::setup().await;
    let email = unique_email("custom");
    let user_id = common::db::create_user(&state.pool, &email, "Author")
        .await
        .expect("Failed to create test user");
    let token = create_test_token(user_id, &email, &state.auth.jwt_secret);
    let topic = unique_name("Bit Manipulation");

    let response = client
        .post_json_with_auth(
            "/problems/custom",
            &json!({
                "name": "  Counting Bits ",
                "difficulty": "Easy",
                "topic": format!(" {topic} "),
                "leetcodeId": "338",
                "customLink": ""
            }),
            &token,
        )
        .await;
    response.assert_status(StatusCode::CREATED);

    let summary: Value = response.json();
    assert_eq!(summary["name"], "Counting Bits");
    assert_eq!(summary["topic"], topic.as_str());
    assert_eq!(summary["isCustom"], true);
    assert_eq!(summary["leetcodeId"], "338");
    assert!(summary["customLink"].is_null());
    assert_eq!(summary["status"], "pending");

    let topics: Value = client.get("/topics").await.json();
    assert!(
        topics
            .as_array()
            .unwrap()
            .iter()
            .any(|t| t["name"] == topic.as_str())
    );

    // Progress exists, so the new problem can be toggled right away
    let id = summary["id"].as_str().unwrap();
    client
        .patch_with_auth(&format!("/problems/{id}/status"), &token)
        .await
        .assert_status(StatusCode::OK);

    let blank = client
        .post_json_with_auth(
            "/problems/custom",
            &json!({ "name": " ", "difficulty": "Hard", "topic": "Graphs" }),
            &token,
        )
        .await;
    blank.assert_status(StatusCode::BAD_REQUEST);

    common::db::delete_user_by_email(&state.pool, &email)
        .await
        .expect("Failed to cleanup database");
    common::db::delete_topic(&state.pool, &topic)
        .await
        .expect("Failed to cleanup topic");
}
