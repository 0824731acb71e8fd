use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ticket::Ticket;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub organizer_id: Option<i64>,
    pub series_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Tickets issued for this event, ordered by ticket id.
    #[sqlx(skip)]
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub organizer_id: Option<i64>,
    pub series_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
}
