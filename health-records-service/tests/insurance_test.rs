mod common;

use axum::http::StatusCode;
use common::{body_json, TestApp, TEST_PROFILE_ID};
use health_records_service::models::HealthInsurance;
use health_records_service::services::MockLlmProvider;
use serde_json::json;

fn policy(id: &str, profile_id: &str, provider: &str) -> HealthInsurance {
    HealthInsurance {
        id: id.to_string(),
        profile_id: profile_id.to_string(),
        provider_name: provider.to_string(),
        policy_number: format!("{}-001", id),
        plan_name: Some("Gold".to_string()),
        plan_type: Some("PPO".to_string()),
        premium_amount: Some(320.0),
        deductible: Some(1000.0),
        out_of_pocket_max: Some(5000.0),
        coverage_start_date: Some("2024-01-01".to_string()),
        coverage_end_date: None,
        covered_services: vec!["physiotherapy".to_string()],
        excluded_services: vec!["cosmetic surgery".to_string()],
        contact_phone: None,
        contact_email: None,
        notes: None,
    }
}

#[tokio::test]
async fn answers_from_every_policy_on_file() {
    let app = TestApp::builder()
        .llm(MockLlmProvider::new(
            "  Yes, physiotherapy is covered after the deductible.\n",
        ))
        .build()
        .await;
    app.store.seed(&[
        policy("pol-1", TEST_PROFILE_ID, "Acme Health"),
        policy("pol-2", TEST_PROFILE_ID, "Dental Plus"),
    ]);

    let response = app
        .post_json(
            "/insurance/ask",
            json!({ "profile_id": TEST_PROFILE_ID, "question": "Is physio covered?" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["answer"],
        "Yes, physiotherapy is covered after the deductible."
    );
    assert_eq!(body["policies_consulted"], 2);

    let prompt = &app.llm.requests()[0].prompt;
    assert!(prompt.contains("Acme Health"));
    assert!(prompt.contains("Dental Plus"));
    assert!(prompt.ends_with("Question: Is physio covered?"));
}

#[tokio::test]
async fn policy_id_narrows_the_context() {
    let app = TestApp::builder()
        .llm(MockLlmProvider::new("Only the dental plan applies."))
        .build()
        .await;
    app.store.seed(&[
        policy("pol-1", TEST_PROFILE_ID, "Acme Health"),
        policy("pol-2", TEST_PROFILE_ID, "Dental Plus"),
    ]);

    let response = app
        .post_json(
            "/insurance/ask",
            json!({
                "profile_id": TEST_PROFILE_ID,
                "question": "Are cleanings covered?",
                "policy_id": "pol-2"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["policies_consulted"], 1);
    let prompt = &app.llm.requests()[0].prompt;
    assert!(prompt.contains("Dental Plus"));
    assert!(!prompt.contains("Acme Health"));
}

#[tokio::test]
async fn policy_of_another_profile_is_not_found() {
    let app = TestApp::spawn().await;
    app.store.seed(&[policy("pol-9", "profile-999", "Acme Health")]);

    let response = app
        .post_json(
            "/insurance/ask",
            json!({
                "profile_id": TEST_PROFILE_ID,
                "question": "Is physio covered?",
                "policy_id": "pol-9"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.llm.call_count(), 0);
}

#[tokio::test]
async fn no_policies_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/insurance/ask",
            json!({ "profile_id": TEST_PROFILE_ID, "question": "Is physio covered?" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.llm.call_count(), 0);
}
