use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::event::Event;

/// A calendar grouping events. Public series are readable without a token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Series {
    pub id: i64,
    pub organizer_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone)]
pub struct NewSeries {
    pub organizer_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}
