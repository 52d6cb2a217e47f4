mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_app;
use common::http::{create_session, get_json, request, response_json};

#[tokio::test]
async fn it_health_live_and_ready() {
    let app = spawn_test_app().await;

    let live = request(&app.app, Method::GET, "/health/live", None, &[]).await;
    let (live_status, _, _) = response_json(live).await;
    assert_eq!(live_status, StatusCode::OK);

    let ready = request(&app.app, Method::GET, "/health/ready", None, &[]).await;
    let (ready_status, _, _) = response_json(ready).await;
    assert_eq!(ready_status, StatusCode::OK);
}

#[tokio::test]
async fn it_health_reports_active_sessions() {
    let app = spawn_test_app().await;

    let (status, body) = get_json(&app.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"]["active"], 0);
    assert_eq!(body["decks"], 2);

    create_session(&app.app, None).await;
    let (_, body) = get_json(&app.app, "/health").await;
    assert_eq!(body["sessions"]["active"], 1);
}

#[tokio::test]
async fn it_responses_carry_request_id() {
    let app = spawn_test_app().await;

    let resp = request(
        &app.app,
        Method::GET,
        "/health/live",
        None,
        &[("x-request-id", "client-123".to_string())],
    )
    .await;
    let (_, headers, _) = response_json(resp).await;
    assert_eq!(headers.get("x-request-id").unwrap(), "client-123");
}
