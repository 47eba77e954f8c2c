//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use finsight_core::test_utils::{MockCompletion, MockCompletionServer};
use finsight_core::{MockBackend, MockFailure, OpenAICompatibleBackend, PromptLibrary};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

const JAMES: &str = r#"{
  "name": "James Thompson",
  "expenses": {
    "categories": [
      {"key": "food", "label": "Food", "monthly": 400},
      {"key": "housing", "label": "Housing", "monthly": 1500},
      {"key": "transport", "label": "Transport", "monthly": 300},
      {"key": "leisure", "label": "Leisure", "monthly": 300}
    ]
  },
  "time_series": {
    "6M": {
      "labels": ["Jan", "Feb", "Mar", "Apr", "May", "Jun"],
      "points": [100, 101, 103, 104, 106, 108],
      "metrics": {"salary": 4000, "resilience": 72, "liq": 64}
    },
    "3Y": {
      "labels": ["2022", "2023", "2024"],
      "points": [90, 100, 112],
      "metrics": {"salary": 4000, "resilience": 70, "liq": 60}
    }
  }
}"#;

const PRIYA: &str = r#"{
  "expenses": {"categories": [{"key": "rent", "label": "Rent", "monthly": 900}]},
  "time_series": {"1Y": {"labels": ["Q1", "Q2"], "points": [1, 2], "metrics": {"salary": 2500}}}
}"#;

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let profiles = dir.path().join("profiles");
    std::fs::create_dir_all(&profiles).unwrap();
    std::fs::write(profiles.join("james_thompson.json"), JAMES).unwrap();
    std::fs::write(profiles.join("priya_shah.json"), PRIYA).unwrap();
    dir
}

fn setup_test_app_with_ai(ai: Option<AIClient>) -> (TempDir, Router) {
    let dir = data_dir();
    let app = create_router_with_options(
        ProfileStore::new(dir.path()),
        None,
        ServerConfig::default(),
        ai,
    );
    (dir, app)
}

fn setup_test_app() -> (TempDir, Router) {
    setup_test_app_with_ai(None)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ========== Health & Profiles ==========

#[tokio::test]
async fn test_health() {
    let (_dir, app) = setup_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_list_profiles() {
    let (_dir, app) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profiles")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let profiles = json["profiles"].as_array().unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0]["id"], "james_thompson");
    assert_eq!(profiles[0]["name"], "James Thompson");
    assert_eq!(profiles[1]["id"], "priya_shah");
    assert_eq!(profiles[1]["name"], "Priya Shah");
}

#[tokio::test]
async fn test_list_profiles_empty_data_dir() {
    let dir = TempDir::new().unwrap();
    let app = create_router_with_options(
        ProfileStore::new(dir.path()),
        None,
        ServerConfig::default(),
        None,
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profiles")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["profiles"], serde_json::json!([]));
}

// ========== Snapshot ==========

#[tokio::test]
async fn test_snapshot_defaults() {
    let (_dir, app) = setup_test_app();

    // No content type, empty body: every field takes its default
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/snapshot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;

    let snapshot = &json["snapshot"];
    assert_eq!(snapshot["period"], "6M");
    assert_eq!(snapshot["monthly_expense_total"], 2500.0);
    assert_eq!(snapshot["savings_est_monthly"], 1500.0);
    assert_eq!(snapshot["expenses"][0]["key"], "housing");
    assert_eq!(snapshot["expenses"][0]["pct"], 60.0);
    assert_eq!(snapshot["flow"]["grain"], "monthly");
    assert_eq!(snapshot["metrics"]["liq"], 64.0);

    let summary = &json["summary"];
    assert_eq!(
        summary["headline"],
        "6M snapshot: estimated savings £1500/month."
    );
    assert_eq!(summary["bullets"].as_array().unwrap().len(), 3);
    assert_eq!(summary["note"], "POC output. Not financial advice.");
}

#[tokio::test]
async fn test_snapshot_yearly_with_question() {
    let (_dir, app) = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/snapshot",
            serde_json::json!({"period": "3Y", "question": "retire at 65 with a holiday"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["snapshot"]["flow"]["grain"], "yearly");
    assert_eq!(
        json["snapshot"]["flow"]["savings"],
        serde_json::json!([18000.0, 18000.0, 18000.0])
    );

    let bullets = json["summary"]["bullets"].as_array().unwrap();
    assert_eq!(bullets.len(), 5);
    assert!(bullets[3].as_str().unwrap().starts_with("Holiday scenario"));
    assert!(bullets[4].as_str().unwrap().starts_with("Retire at 65"));
}

#[tokio::test]
async fn test_snapshot_unknown_period() {
    let (_dir, app) = setup_test_app();

    let response = app
        .oneshot(post_json("/api/snapshot", serde_json::json!({"period": "10Y"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Unknown period: 10Y");
}

#[tokio::test]
async fn test_snapshot_unknown_profile_uses_default() {
    let (_dir, app) = setup_test_app();

    let response = app
        .oneshot(post_json("/api/snapshot", serde_json::json!({"profile": "nobody"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["snapshot"]["salary_monthly"], 4000.0);
}

#[tokio::test]
async fn test_snapshot_missing_profile_data() {
    let dir = TempDir::new().unwrap();
    let app = create_router_with_options(
        ProfileStore::new(dir.path()),
        None,
        ServerConfig::default(),
        None,
    );

    let response = app
        .oneshot(post_json("/api/snapshot", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("james_thompson"));
}

#[tokio::test]
async fn test_snapshot_rejects_path_traversal() {
    let (_dir, app) = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/snapshot",
            serde_json::json!({"profile": "../james_thompson"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_snapshot_invalid_json() {
    let (_dir, app) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/snapshot")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_snapshot_ai_summary() {
    let ai = AIClient::Mock(MockBackend::with_reply("Steady position."));
    let (_dir, app) = setup_test_app_with_ai(Some(ai));

    let response = app
        .oneshot(post_json(
            "/api/snapshot",
            serde_json::json!({"ai_summary": true}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["summary"]["headline"], "Financial Insight Summary");
    assert_eq!(json["summary"]["bullets"], serde_json::json!(["Steady position."]));
}

// ========== Simulate ==========

#[tokio::test]
async fn test_simulate_empty_question() {
    let (_dir, app) = setup_test_app();

    // Unknown period is never looked at for a blank question
    let response = app
        .oneshot(post_json(
            "/api/simulate",
            serde_json::json!({"period": "10Y", "question": null}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({
            "heading": "",
            "lines": ["Type a scenario question first (e.g. 'retire at 65')."],
            "enabled": true
        })
    );
}

#[tokio::test]
async fn test_simulate_local_fallback() {
    let (_dir, app) = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/simulate",
            serde_json::json!({"question": "retire at 60"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["heading"], "Scenario: retire at 60");
    assert_eq!(json["lines"][0], "Period: 6M");
    assert_eq!(
        json["lines"][1],
        "Income £4000/month | Expenses £2500/month | Savings £1500/month"
    );
    assert_eq!(json["enabled"], true);
}

#[tokio::test]
async fn test_simulate_remote_success() {
    let (_dir, app) = setup_test_app_with_ai(Some(AIClient::mock()));

    let response = app
        .oneshot(post_json(
            "/api/simulate",
            serde_json::json!({"question": "holiday budget", "period": "3Y"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["heading"], "Mock plan: holiday budget");
    assert_eq!(json["enabled"], true);
}

#[tokio::test]
async fn test_simulate_transport_error() {
    let ai = AIClient::Mock(MockBackend::failing(MockFailure::Transport));
    let (_dir, app) = setup_test_app_with_ai(Some(ai));

    let response = app
        .oneshot(post_json(
            "/api/simulate",
            serde_json::json!({"question": "retire"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["heading"], "Error");
    assert_eq!(json["enabled"], false);
}

#[tokio::test]
async fn test_simulate_upstream_error_falls_back() {
    let server = MockCompletionServer::start_with(MockCompletion::Status(500)).await;
    let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "mock-model", "sk-test")
        .with_prompts(PromptLibrary::embedded_only());
    let (_dir, app) = setup_test_app_with_ai(Some(AIClient::OpenAICompatible(backend)));

    let response = app
        .oneshot(post_json(
            "/api/simulate",
            serde_json::json!({"question": "retire at 60"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["heading"], "Scenario: retire at 60");
    assert_eq!(json["enabled"], true);
    assert_eq!(server.requests().len(), 1);
}

// ========== Scenario Completion ==========

fn completion_body() -> serde_json::Value {
    serde_json::json!({
        "question": "Can I retire at 60?",
        "snapshot": {
            "period": "1Y",
            "salary_monthly": 4000,
            "monthly_expense_total": 2500,
            "savings_est_monthly": 1500,
            "resilience": 72,
            "liquidity": 64,
            "expenses": [{"key": "housing", "label": "Housing", "monthly": 1500, "pct": 60}]
        }
    })
}

#[tokio::test]
async fn test_completion_method_not_allowed() {
    let (_dir, app) = setup_test_app_with_ai(Some(AIClient::mock()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/scenario-completion")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Method not allowed");
}

#[tokio::test]
async fn test_completion_without_backend() {
    let (_dir, app) = setup_test_app();

    let response = app
        .oneshot(post_json("/api/scenario-completion", completion_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "OPENAI_API_KEY not configured");
}

#[tokio::test]
async fn test_completion_missing_fields() {
    for body in [
        serde_json::json!({"question": "retire"}),
        serde_json::json!({"snapshot": {"period": "6M"}}),
        serde_json::json!({"question": "   ", "snapshot": {"period": "6M"}}),
        serde_json::json!({"question": "retire", "snapshot": null}),
    ] {
        let (_dir, app) = setup_test_app_with_ai(Some(AIClient::mock()));
        let response = app
            .oneshot(post_json("/api/scenario-completion", body.clone()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let json = get_body_json(response).await;
        assert_eq!(json["error"], "Missing question or snapshot");
    }
}

#[tokio::test]
async fn test_completion_success() {
    let server = MockCompletionServer::start().await;
    let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "mock-model", "sk-test")
        .with_prompts(PromptLibrary::embedded_only());
    let (_dir, app) = setup_test_app_with_ai(Some(AIClient::OpenAICompatible(backend)));

    let response = app
        .oneshot(post_json("/api/scenario-completion", completion_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["heading"], "Plan for: Can I retire at 60?");
    assert_eq!(json["lines"].as_array().unwrap().len(), 3);
    assert_eq!(json["enabled"], true);

    let requests = server.requests();
    let user = requests[0].body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Income per month: £4000"));
    assert!(user.contains("Largest expenses: Housing £1500"));
}

#[tokio::test]
async fn test_completion_request_period_sets_time_horizon() {
    let server = MockCompletionServer::start().await;
    let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "mock-model", "sk-test")
        .with_prompts(PromptLibrary::embedded_only());
    let (_dir, app) = setup_test_app_with_ai(Some(AIClient::OpenAICompatible(backend)));

    let mut body = completion_body();
    body["period"] = serde_json::json!("5Y");
    body["snapshot"].as_object_mut().unwrap().remove("period");

    let response = app
        .oneshot(post_json("/api/scenario-completion", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let requests = server.requests();
    let user = requests[0].body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Time horizon: 5Y\n"));
}

#[tokio::test]
async fn test_completion_time_horizon_falls_back_to_snapshot_period() {
    let server = MockCompletionServer::start().await;
    let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "mock-model", "sk-test")
        .with_prompts(PromptLibrary::embedded_only());
    let (_dir, app) = setup_test_app_with_ai(Some(AIClient::OpenAICompatible(backend)));

    let response = app
        .oneshot(post_json("/api/scenario-completion", completion_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let requests = server.requests();
    let user = requests[0].body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Time horizon: 1Y\n"));
}

#[tokio::test]
async fn test_completion_tolerates_sparse_snapshot() {
    let server = MockCompletionServer::start().await;
    let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "mock-model", "sk-test")
        .with_prompts(PromptLibrary::embedded_only());
    let (_dir, app) = setup_test_app_with_ai(Some(AIClient::OpenAICompatible(backend)));

    let body = serde_json::json!({
        "period": "6M",
        "question": "retire?",
        "snapshot": {
            "salary_monthly": null,
            "monthly_expense_total": "2500",
            "labels": [2024],
            "expenses": "none"
        }
    });
    let response = app
        .oneshot(post_json("/api/scenario-completion", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["heading"], "Plan for: retire?");

    let requests = server.requests();
    let user = requests[0].body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Income per month: £0"));
    assert!(user.contains("Expenses per month: £2500"));
    assert!(!user.contains("Largest expenses"));
}

#[tokio::test]
async fn test_completion_upstream_failure() {
    let server = MockCompletionServer::start_with(MockCompletion::Status(502)).await;
    let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "mock-model", "sk-test")
        .with_prompts(PromptLibrary::embedded_only());
    let (_dir, app) = setup_test_app_with_ai(Some(AIClient::OpenAICompatible(backend)));

    let response = app
        .oneshot(post_json("/api/scenario-completion", completion_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Simulation failed");
    assert!(json["detail"].as_str().unwrap().contains("502"));
}

#[tokio::test]
async fn test_completion_unparsable_body() {
    let (_dir, app) = setup_test_app_with_ai(Some(AIClient::mock()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/scenario-completion")
                .body(Body::from("{oops"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Simulation failed");
    assert!(json["detail"].is_string());
}

// ========== CORS ==========

#[tokio::test]
async fn test_cors_allowed_origin() {
    let dir = data_dir();
    let config = ServerConfig {
        allowed_origins: vec!["http://localhost:5173".to_string()],
    };
    let app = create_router_with_options(ProfileStore::new(dir.path()), None, config, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_cors_default_is_same_origin() {
    let (_dir, app) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}
