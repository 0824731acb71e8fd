mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

async fn create_series(app: &TestApp, name: &str, is_public: bool) -> i64 {
    let (status, body) = app
        .post("/series", json!({ "name": name, "isPublic": is_public }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().expect("series id")
}

#[tokio::test]
async fn test_private_series_hidden_from_public_lookup() {
    let app = TestApp::spawn().await;
    let private = create_series(&app, "Warehouse nights", false).await;
    let public = create_series(&app, "Beach sessions", true).await;

    let (status, body) = app.get(&format!("/series/{private}/public")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = app.get(&format!("/series/{public}/public")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Beach sessions");
    assert_eq!(body["data"]["isPublic"], true);

    let (status, body) = app
        .request(Method::GET, &format!("/series/{private}"), None, true)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isPublic"], false);
}

#[tokio::test]
async fn test_owner_lookup_requires_token() {
    let app = TestApp::spawn().await;
    let id = create_series(&app, "Closed circle", false).await;

    let (status, body) = app.get(&format!("/series/{id}")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");
}

#[tokio::test]
async fn test_add_event_to_series() {
    let app = TestApp::spawn().await;
    let series = create_series(&app, "Summer tour", true).await;
    let event = app.create_event("Tour opener").await;

    let (status, body) = app
        .post(&format!("/series/{series}/events/{event}"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let events = body["data"]["events"].as_array().expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], event);

    let (status, body) = app.get(&format!("/events/{event}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["seriesId"], series);

    let (status, _) = app
        .post(&format!("/series/{series}/events/99999"), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
