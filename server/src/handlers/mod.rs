use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::services::NotifierStats;
use crate::state::AppState;
use crate::utils::response::success;

pub mod auth;
pub mod events;
pub mod series;
pub mod tickets;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
    notifications: NotifierStats,
}

pub async fn health_check(State(state): State<AppState>) -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "rave-organizer",
        notifications: state.notifier.stats(),
    };

    success(payload, "Health check successful")
}
