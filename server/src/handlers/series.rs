use axum::extract::State;
use axum::response::Response;

use crate::auth::AuthUser;
use crate::dto::CreateSeriesRequest;
use crate::state::AppState;
use crate::utils::response::{created, success};
use crate::utils::{Result, ValidJson, ValidPath};

pub async fn create_series(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ValidJson(request): ValidJson<CreateSeriesRequest>,
) -> Result<Response> {
    let series = state.series.create_series(request).await?;
    Ok(created(series, "series created successfully"))
}

pub async fn get_series(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<Response> {
    let series = state.series.get_series(id).await?;
    Ok(success(series, "series retrieved successfully"))
}

pub async fn get_public_series(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Response> {
    let series = state.series.get_public_series(id).await?;
    Ok(success(series, "series retrieved successfully"))
}

pub async fn add_event_to_series(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    ValidPath((series_id, event_id)): ValidPath<(i64, i64)>,
) -> Result<Response> {
    let series = state.series.add_event_to_series(series_id, event_id).await?;
    Ok(success(series, "event added to series"))
}
