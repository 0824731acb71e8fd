use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    /// Owning event. The event holds the forward list.
    pub event_id: i64,
    pub ticket_type: String,
    pub name: String,
    pub stock: i32,
    pub number_available: i32,
    pub price: Decimal,
    pub discount_code: Option<String>,
    pub discount_price: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub purchase_limit: i32,
    pub available_discounted_tickets: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub ticket_type: String,
    pub name: String,
    pub stock: i32,
    pub number_available: i32,
    pub price: Decimal,
    pub discount_code: Option<String>,
    pub discount_price: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub purchase_limit: i32,
    pub available_discounted_tickets: i32,
}
