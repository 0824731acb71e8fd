use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer};
use crate::handlers::{auth, events, health_check, series, tickets};
use crate::state::AppState;

#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub allowed_origins: Option<String>,
    pub include_hsts: bool,
}

pub fn create_routes(state: AppState, options: &RouterOptions) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/tickets", post(tickets::create_ticket))
        .route("/tickets/:id", get(tickets::get_ticket))
        .route("/events", post(events::create_event))
        .route("/events/:id", get(events::get_event))
        .route("/events/:id/tickets", get(tickets::get_event_tickets))
        .route("/series", post(series::create_series))
        .route("/series/:id", get(series::get_series))
        .route("/series/:id/public", get(series::get_public_series))
        .route(
            "/series/:id/events/:event_id",
            post(series::add_event_to_series),
        )
        .route("/auth/google/login", get(auth::google_login))
        .route("/auth/google/callback", get(auth::google_callback))
        .with_state(state);

    apply_security_headers(router, options.include_hsts)
        .layer(create_cors_layer(options.allowed_origins.as_deref()))
        .layer(TraceLayer::new_for_http())
}
