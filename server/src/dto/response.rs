use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Event, Series, Ticket};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: i64,
    pub event_id: i64,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub name: String,
    pub stock: i32,
    pub number_available: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub discount_code: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub discount_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub percentage: Option<Decimal>,
    pub purchase_limit: i32,
    pub available_discounted_tickets: i32,
}

impl From<&Ticket> for TicketResponse {
    fn from(ticket: &Ticket) -> Self {
        TicketResponse {
            id: ticket.id,
            event_id: ticket.event_id,
            ticket_type: ticket.ticket_type.clone(),
            name: ticket.name.clone(),
            stock: ticket.stock,
            number_available: ticket.number_available,
            price: ticket.price,
            discount_code: ticket.discount_code.clone(),
            discount_price: ticket.discount_price,
            percentage: ticket.percentage,
            purchase_limit: ticket.purchase_limit,
            available_discounted_tickets: ticket.available_discounted_tickets,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i64,
    pub organizer_id: Option<i64>,
    pub series_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<TicketResponse>,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        EventResponse {
            id: event.id,
            organizer_id: event.organizer_id,
            series_id: event.series_id,
            name: event.name.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            created_at: event.created_at,
            tickets: event.tickets.iter().map(TicketResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub events: Vec<EventResponse>,
}

impl From<&Series> for SeriesResponse {
    fn from(series: &Series) -> Self {
        SeriesResponse {
            id: series.id,
            name: series.name.clone(),
            description: series.description.clone(),
            is_public: series.is_public,
            events: series.events.iter().map(EventResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_response_uses_wire_names() {
        let now = Utc::now();
        let ticket = Ticket {
            id: 7,
            event_id: 1,
            ticket_type: "VIP".into(),
            name: "VIP pass".into(),
            stock: 50,
            number_available: 50,
            price: Decimal::from(100),
            discount_code: None,
            discount_price: None,
            percentage: None,
            purchase_limit: 4,
            available_discounted_tickets: 0,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(TicketResponse::from(&ticket)).unwrap();
        assert_eq!(json["type"], "VIP");
        assert_eq!(json["numberAvailable"], 50);
        assert_eq!(json["eventId"], 1);
        assert_eq!(json["price"], 100.0);
        assert!(json["discountPrice"].is_null());
    }
}
