use axum::extract::{Query, State};
use axum::response::Response;

use crate::dto::OAuthCallbackQuery;
use crate::state::AppState;
use crate::utils::response::success;
use crate::utils::Result;

pub async fn google_login(State(state): State<AppState>) -> Result<Response> {
    let url = state.oauth.begin_login()?;
    Ok(success(url, "redirect to google"))
}

pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Response> {
    let redirect = state
        .oauth
        .complete_login(&query.state, &query.code)
        .await?;
    Ok(success(redirect, "login successful"))
}
