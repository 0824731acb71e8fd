use axum::extract::State;
use axum::response::Response;

use crate::auth::AuthUser;
use crate::dto::CreateTicketRequest;
use crate::state::AppState;
use crate::utils::response::{created, success};
use crate::utils::{Result, ValidJson, ValidPath};

pub async fn create_ticket(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(request): ValidJson<CreateTicketRequest>,
) -> Result<Response> {
    tracing::debug!(user = %user.username, event_id = request.event_id, "Create ticket requested");
    let ticket = state.tickets.create_ticket_for(request).await?;
    Ok(created(ticket, "ticket created successfully"))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Response> {
    let ticket = state.tickets.get_ticket_by_id(id).await?;
    Ok(success(ticket, "ticket retrieved successfully"))
}

pub async fn get_event_tickets(
    State(state): State<AppState>,
    ValidPath(event_id): ValidPath<i64>,
) -> Result<Response> {
    let tickets = state.tickets.get_all_tickets_for(event_id).await?;
    Ok(success(tickets, "tickets retrieved successfully"))
}
