//! Shared setup: an in-memory app wired to wiremock endpoints.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

use rave_server::auth::{GoogleOAuthProvider, OAuthService, TokenIssuer};
use rave_server::config::{GoogleConfig, NotifierConfig};
use rave_server::models::User;
use rave_server::repositories::memory::InMemoryStore;
use rave_server::routes::{create_routes, RouterOptions};
use rave_server::services::TicketNotifier;
use rave_server::AppState;

pub const JWT_SECRET: &str = "integration-secret";
pub const FRONTEND_TOKEN_URL: &str = "http://localhost:5173/validate-token";

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
    pub notifier: TicketNotifier,
    pub google: MockServer,
    pub ticket_service: MockServer,
    pub token: String,
}

pub fn notifier_config(url: Option<String>) -> NotifierConfig {
    NotifierConfig {
        ticket_service_url: url,
        queue_capacity: 16,
        max_retries: 2,
        concurrency: 4,
        initial_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(50),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let google = MockServer::start().await;
        let ticket_service = MockServer::start().await;

        let mut google_config = GoogleConfig::new(
            "test-client".into(),
            "test-secret".into(),
            "http://localhost:8000/auth/google/callback".into(),
        );
        google_config.auth_url = format!("{}/o/oauth2/v2/auth", google.uri());
        google_config.token_url = format!("{}/token", google.uri());
        google_config.userinfo_url = format!("{}/oauth2/v2/userinfo", google.uri());

        let http_client = reqwest::Client::new();
        let (notifier, _worker) = TicketNotifier::spawn(
            &notifier_config(Some(format!("{}/tickets", ticket_service.uri()))),
            http_client.clone(),
        );

        let tokens = TokenIssuer::new(JWT_SECRET, Duration::from_secs(3600));
        let token = tokens
            .issue(&User::new("organizer@example.com"))
            .expect("issue test token");
        let oauth = OAuthService::new(
            Arc::new(GoogleOAuthProvider::new(google_config, http_client)),
            tokens,
            Duration::from_secs(60),
            FRONTEND_TOKEN_URL,
        );

        let store = InMemoryStore::new();
        let state = AppState::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            oauth,
            notifier.clone(),
        );

        Self {
            router: create_routes(state, &RouterOptions::default()),
            store,
            notifier,
            google,
            ticket_service,
            token,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        authorized: bool,
    ) -> (StatusCode, Value) {
        let body = body.map(|json| json.to_string());
        self.send(method, uri, body, authorized).await
    }

    /// Send `body` verbatim as `application/json`, well-formed or not.
    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body.to_string()), true).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
        authorized: bool,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if authorized {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        }
        let request = match body {
            Some(text) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(text)),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, false).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), true).await
    }

    /// Create an event through the API and return its id.
    pub async fn create_event(&self, name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/events",
                serde_json::json!({
                    "name": name,
                    "description": "Afrobeats till dawn",
                    "location": "Landmark Beach, Lagos"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().expect("event id")
    }
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
