// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: gateway router over real SQLite storage against a
//! wiremock Mailchimp.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use merchsync_gateway::{AuthConfig, GatewayState, router};
use merchsync_mailchimp::MailchimpConnector;
use merchsync_settings::{SettingsOrchestrator, SiteIdentity};
use merchsync_storage::Database;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-admin-token";

struct E2e {
    state: GatewayState,
    _dir: tempfile::TempDir,
}

async fn setup(mailchimp: &MockServer) -> E2e {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("e2e.db");
    let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

    let orchestrator = Arc::new(SettingsOrchestrator::new(
        MailchimpConnector::new(Some(mailchimp.uri())),
        db.clone(),
        db.clone(),
        SiteIdentity {
            name: "Example Shop".into(),
            url: "https://shop.example.com".into(),
            platform: "merchsync".into(),
        },
    ));

    E2e {
        state: GatewayState {
            orchestrator,
            db,
            auth: AuthConfig {
                bearer_token: Some(TOKEN.into()),
            },
            start_time: std::time::Instant::now(),
        },
        _dir: dir,
    }
}

async fn send_json(
    state: &GatewayState,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn authed_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let mailchimp = MockServer::start().await;
    let e2e = setup(&mailchimp).await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(&e2e.state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn admin_routes_reject_without_token() {
    let mailchimp = MockServer::start().await;
    let e2e = setup(&mailchimp).await;

    let request = Request::builder()
        .uri("/v1/settings")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send_json(&e2e.state, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn api_key_submission_persists_on_live_ping() {
    let mailchimp = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"health_status": "Everything's Chimpy!"})),
        )
        .mount(&mailchimp)
        .await;

    let e2e = setup(&mailchimp).await;

    let (status, body) = send_json(
        &e2e.state,
        authed_post(
            "/v1/settings",
            serde_json::json!({
                "mailchimp_active_tab": "api_key",
                "mailchimp_api_key": "0123456789abcdef-us6",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["mailchimp_api_key"], "0123456789abcdef-us6");
    assert_eq!(body["validation"]["api_ping"], true);
}

#[tokio::test]
async fn rejected_api_key_is_not_persisted() {
    let mailchimp = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "title": "API Key Invalid",
            "status": 401
        })))
        .mount(&mailchimp)
        .await;

    let e2e = setup(&mailchimp).await;

    let (status, body) = send_json(
        &e2e.state,
        authed_post(
            "/v1/settings",
            serde_json::json!({
                "mailchimp_active_tab": "api_key",
                "mailchimp_api_key": "wrong-key-us6",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["settings"].get("mailchimp_api_key").is_none());
    assert_eq!(body["validation"]["api_ping"], false);
}

#[tokio::test]
async fn partial_store_info_fails_and_status_reflects_it() {
    let mailchimp = MockServer::start().await;
    let e2e = setup(&mailchimp).await;

    let (status, body) = send_json(
        &e2e.state,
        authed_post(
            "/v1/settings",
            serde_json::json!({
                "mailchimp_active_tab": "store_info",
                "store_name": "Example Shop",
                "store_city": "Atlanta",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["settings"].get("store_city").is_none());
    assert_eq!(body["validation"]["store_info"], false);

    let (status, body) = send_json(&e2e.state, authed_get("/v1/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready_for_sync"], false);
    assert_eq!(body["validation"]["store_info"], false);
}

#[tokio::test]
async fn unknown_debug_action_is_a_404() {
    let mailchimp = MockServer::start().await;
    let e2e = setup(&mailchimp).await;

    let (status, body) = send_json(
        &e2e.state,
        authed_post("/v1/debug/frobnicate", serde_json::json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("frobnicate"));
}

#[tokio::test]
async fn restart_sync_enqueues_a_job() {
    let mailchimp = MockServer::start().await;
    let e2e = setup(&mailchimp).await;

    let (status, body) = send_json(
        &e2e.state,
        authed_post("/v1/debug/restart_sync", serde_json::json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restarted"], true);
    assert!(body["job_id"].as_i64().unwrap() > 0);

    let pending = merchsync_storage::queries::queue::count_with_status(
        &e2e.state.db,
        merchsync_storage::SYNC_QUEUE,
        "pending",
    )
    .await
    .unwrap();
    assert_eq!(pending, 1);
}
