//! Repository traits for data access.
//!
//! `postgres` holds the production implementations; `memory` holds
//! in-process implementations for tests.

use async_trait::async_trait;

use crate::models::{Event, NewEvent, NewSeries, NewTicket, Series, Ticket};
use crate::utils::Result;

#[cfg(feature = "test-utils")]
pub mod memory;
pub mod postgres;

pub use postgres::{PgEventRepository, PgSeriesRepository, PgTicketRepository};

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert an event. Fails with `NotFound` if `series_id` names no series.
    async fn save(&self, event: NewEvent) -> Result<Event>;

    /// Find an event with its tickets loaded.
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Ticket>>;

    /// Tickets of an event ordered by id; empty when there are none.
    async fn find_all_by_event_id(&self, event_id: i64) -> Result<Vec<Ticket>>;

    /// Insert the ticket and append it to `event` as one unit. On any
    /// failure neither write is visible. Returns the saved ticket and the
    /// event as persisted afterwards.
    async fn save_for_event(&self, event: &Event, ticket: NewTicket) -> Result<(Ticket, Event)>;
}

#[async_trait]
pub trait SeriesRepository: Send + Sync {
    async fn save(&self, series: NewSeries) -> Result<Series>;

    /// Find a series with its events loaded.
    async fn find_by_id(&self, id: i64) -> Result<Option<Series>>;

    /// Like `find_by_id` but only matches public series.
    async fn find_public_by_id(&self, id: i64) -> Result<Option<Series>>;

    /// Attach an existing event to an existing series.
    async fn add_event(&self, series_id: i64, event_id: i64) -> Result<Series>;
}
