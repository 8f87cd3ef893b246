use std::collections::HashSet;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use cpt_core::{
    EngineError, PlanRequest, create_plan,
    models::SkillLevel,
    testing::{FailingStore, StoreFailure},
};
use cpt_db::PgStore;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::common::{
    self,
    jwt::create_test_token,
    test_data::{unique_email, unique_name},
};

async fn user_with_token(state: &cpt_api::ApiState, base: &str) -> (String, Uuid, String) {
    let email = unique_email(base);
    let user_id = common::db::create_user(&state.pool, &email, base)
        .await
        .expect("Failed to create test user");
    let token = create_test_token(user_id, &email, &state.auth.jwt_secret);
    (email, user_id, token)
}

fn problems(plan: &Value) -> Vec<&Value> {
    plan.as_array()
        .expect("plan should be an array")
        .iter()
        .flat_map(|day| day["problems"].as_array().expect("problems").iter())
        .collect()
}

#[tokio::test]
async fn test_create_plan_with_seeded_catalog() {
    let (state, client) = common::setup().await;
    let (email, user_id, token) = user_with_token(&state, "planner").await;

    let response = client
        .post_json_with_auth("/study-plan", &json!({ "level": "intermediate", "days": 4 }), &token)
        .await;
    response.assert_status(StatusCode::OK);

    let plan: Value = response.json();
    let days = plan.as_array().unwrap();
    assert_eq!(days.len(), 4);
    for (i, day) in days.iter().enumerate() {
        assert_eq!(day["day"], i + 1);
        assert_eq!(day["problems"].as_array().unwrap().len(), 3);
    }

    let today = Utc::now().date_naive();
    assert_eq!(days[0]["date"], today.format("%a, %b %d, %y").to_string());
    assert_eq!(
        days[3]["date"],
        (today + Duration::days(3)).format("%a, %b %d, %y").to_string()
    );

    let all = problems(&plan);
    let count = |d: &str| all.iter().filter(|p| p["difficulty"] == d).count();
    assert_eq!((count("Easy"), count("Medium"), count("Hard")), (3, 6, 3));
    assert!(all.iter().all(|p| p["status"] == "pending" && p["notes"] == ""));

    let ids: HashSet<&str> = all.iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 12);

    assert!(common::db::active_plan_id(&state.pool, user_id).await.unwrap().is_some());

    common::db::delete_user_by_email(&state.pool, &email)
        .await
        .expect("Failed to cleanup database");
}

#[tokio::test]
async fn test_regeneration_replaces_active_plan() {
    let (state, client) = common::setup().await;
    let (email, user_id, token) = user_with_token(&state, "regen").await;

    let body = json!({ "level": "beginner", "days": 3 });
    client
        .post_json_with_auth("/study-plan", &body, &token)
        .await
        .assert_status(StatusCode::OK);
    let first = common::db::active_plan_id(&state.pool, user_id).await.unwrap();

    client
        .post_json_with_auth("/study-plan", &body, &token)
        .await
        .assert_status(StatusCode::OK);
    let second = common::db::active_plan_id(&state.pool, user_id).await.unwrap();

    assert!(first.is_some() && second.is_some());
    assert_ne!(first, second);
    assert_eq!(common::db::count_plans(&state.pool, user_id).await.unwrap(), 1);

    common::db::delete_user_by_email(&state.pool, &email)
        .await
        .expect("Failed to cleanup database");
}

#[tokio::test]
async fn test_topic_filter() {
    let (state, client) = common::setup().await;
    let (email, _user_id, token) = user_with_token(&state, "topics").await;

    let response = client
        .post_json_with_auth(
            "/study-plan",
            &json!({ "level": "pro", "days": 2, "topics": ["  linked   list ", "Unknown Topic"] }),
            &token,
        )
        .await;
    response.assert_status(StatusCode::OK);

    let plan: Value = response.json();
    let all = problems(&plan);
    assert!(!all.is_empty());
    assert!(all.len() <= 6);
    assert!(all.iter().all(|p| p["topic"] == "Linked List"));

    let response = client
        .post_json_with_auth(
            "/study-plan",
            &json!({ "level": "pro", "days": 2, "topics": null }),
            &token,
        )
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(problems(&response.json()).len(), 6);

    common::db::delete_user_by_email(&state.pool, &email)
        .await
        .expect("Failed to cleanup database");
}

#[tokio::test]
async fn test_days_out_of_range() {
    let (state, client) = common::setup().await;
    let (email, user_id, token) = user_with_token(&state, "range").await;

    for days in [-1, 0, 366] {
        let response = client
            .post_json_with_auth("/study-plan", &json!({ "level": "beginner", "days": days }), &token)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    // Unknown level is rejected by the JSON extractor
    let response = client
        .post_json_with_auth("/study-plan", &json!({ "level": "expert", "days": 5 }), &token)
        .await;
    assert!(response.status.is_client_error());

    assert!(common::db::active_plan_id(&state.pool, user_id).await.unwrap().is_none());

    common::db::delete_user_by_email(&state.pool, &email)
        .await
        .expect("Failed to cleanup database");
}

#[tokio::test]
async fn test_failed_regeneration_keeps_previous_plan() {
    let (state, client) = common::setup().await;
    let (email, user_id, token) = user_with_token(&state, "rollback").await;

    client
        .post_json_with_auth("/study-plan", &json!({ "level": "beginner", "days": 3 }), &token)
        .await
        .assert_status(StatusCode::OK);
    let previous = common::db::active_plan_id(&state.pool, user_id)
        .await
        .unwrap()
        .expect("plan should be active");
    let previous_tasks = common::db::count_tasks(&state.pool, previous).await.unwrap();
    assert!(previous_tasks > 0);

    let mut tx = state.pool.begin().await.unwrap();
    let mut store = FailingStore::new(PgStore::new(&mut tx), "save_tasks");
    let request = PlanRequest {
        skill_level: SkillLevel::Pro,
        days: 5,
        topics: None,
    };
    let result = create_plan(&mut store, user_id, &request, Utc::now().date_naive()).await;
    assert!(matches!(
        result,
        Err(EngineError::Store(StoreFailure::Injected("save_tasks")))
    ));
    assert!(store.calls().contains(&"delete_plan"));

    // Dropped without commit, as the handler does on error
    drop(store);
    drop(tx);

    assert_eq!(
        common::db::active_plan_id(&state.pool, user_id).await.unwrap(),
        Some(previous)
    );
    assert_eq!(
        common::db::count_tasks(&state.pool, previous).await.unwrap(),
        previous_tasks
    );
    assert_eq!(common::db::count_plans(&state.pool, user_id).await.unwrap(), 1);

    common::db::delete_user_by_email(&state.pool, &email)
        .await
        .expect("Failed to cleanup database");
}

#[tokio::test]
async fn test_topic_filter_with_non_ascii_name() {
    let (state, client) = common::setup().await;
    let (email, _user_id, token) = user_with_token(&state, "accents").await;
    let topic = unique_name("Árboles Ñandú");

    client
        .post_json_with_auth(
            "/problems/custom",
            &json!({ "name": "Poda de ramas", "difficulty": "Easy", "topic": topic }),
            &token,
        )
        .await
        .assert_status(StatusCode::CREATED);

    // Only the ASCII letters change case; the accented ones must match as stored
    let requested = topic.replace("rboles", "RBOLES").replace("and", "AND");
    let response = client
        .post_json_with_auth(
            "/study-plan",
            &json!({ "level": "beginner", "days": 1, "topics": [requested] }),
            &token,
        )
        .await;
    response.assert_status(StatusCode::OK);

    let plan: Value = response.json();
    let all = problems(&plan);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["topic"], topic.as_str());
    assert_eq!(all[0]["name"], "Poda de ramas");

    common::db::delete_user_by_email(&state.pool, &email)
        .await
        .expect("Failed to cleanup database");
    common::db::delete_topic(&state.pool, &topic)
        .await
        .expect("Failed to cleanup topic");
}
