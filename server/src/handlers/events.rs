use axum::extract::State;
use axum::response::Response;

use crate::auth::AuthUser;
use crate::dto::CreateEventRequest;
use crate::state::AppState;
use crate::utils::response::{created, success};
use crate::utils::{Result, ValidJson, ValidPath};

pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ValidJson(request): ValidJson<CreateEventRequest>,
) -> Result<Response> {
    let event = state.events.create_event(request).await?;
    Ok(created(event, "event created successfully"))
}

pub async fn get_event(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Response> {
    let event = state.events.get_event(id).await?;
    Ok(success(event, "event retrieved successfully"))
}
