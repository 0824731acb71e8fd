use std::sync::Arc;

use tracing::{info, instrument};

use super::notification::{NewTicketMessage, TicketNotifier};
use crate::dto::{CreateTicketRequest, TicketResponse};
use crate::models::NewTicket;
use crate::repositories::{EventRepository, TicketRepository};
use crate::utils::{AppError, Result};

#[derive(Clone)]
pub struct TicketService {
    tickets: Arc<dyn TicketRepository>,
    events: Arc<dyn EventRepository>,
    notifier: TicketNotifier,
}

impl TicketService {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        events: Arc<dyn EventRepository>,
        notifier: TicketNotifier,
    ) -> Self {
        Self {
            tickets,
            events,
            notifier,
        }
    }

    /// Create a ticket for an existing event and queue the new-ticket
    /// notification. The response does not wait for delivery.
    #[instrument(skip(self, request), fields(event_id = request.event_id))]
    pub async fn create_ticket_for(&self, request: CreateTicketRequest) -> Result<TicketResponse> {
        request.validate()?;

        let event_id = request.event_id;
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("event", event_id))?;

        let ticket = NewTicket::from(request);
        let (saved, event) = self.tickets.save_for_event(&event, ticket).await?;
        info!(ticket_id = saved.id, ticket_type = %saved.ticket_type, "New ticket created");

        let response = TicketResponse::from(&saved);
        self.notifier.notify(NewTicketMessage::new(&event, &response));
        Ok(response)
    }

    pub async fn get_ticket_by_id(&self, id: i64) -> Result<TicketResponse> {
        self.tickets
            .find_by_id(id)
            .await?
            .map(|ticket| TicketResponse::from(&ticket))
            .ok_or_else(|| AppError::not_found("ticket", id))
    }

    pub async fn get_all_tickets_for(&self, event_id: i64) -> Result<Vec<TicketResponse>> {
        let tickets = self.tickets.find_all_by_event_id(event_id).await?;
        Ok(tickets.iter().map(TicketResponse::from).collect())
    }
}
