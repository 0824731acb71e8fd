//! In-process store implementing every repository trait. Writes to
//! events, tickets and series go through a single lock, so each call is
//! atomic the way the Postgres transactions are.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::{EventRepository, SeriesRepository, TicketRepository};
use crate::models::{Event, NewEvent, NewSeries, NewTicket, Series, Ticket};
use crate::utils::{AppError, Result};

#[derive(Default)]
struct Tables {
    events: BTreeMap<i64, Event>,
    tickets: BTreeMap<i64, Ticket>,
    series: BTreeMap<i64, Series>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn event_with_tickets(&self, id: i64) -> Option<Event> {
        let mut event = self.events.get(&id)?.clone();
        event.tickets = self
            .tickets
            .values()
            .filter(|t| t.event_id == id)
            .cloned()
            .collect();
        Some(event)
    }

    fn series_with_events(&self, id: i64) -> Option<Series> {
        let mut series = self.series.get(&id)?.clone();
        series.events = self
            .events
            .values()
            .filter(|e| e.series_id == Some(id))
            .filter_map(|e| self.event_with_tickets(e.id))
            .collect();
        Some(series)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_event_updates: Arc<AtomicBool>,
    fail_ticket_inserts: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every event write fail with a persistence error.
    pub fn fail_event_updates(&self, fail: bool) {
        self.fail_event_updates.store(fail, Ordering::SeqCst);
    }

    /// Make every ticket insert fail with a persistence error.
    pub fn fail_ticket_inserts(&self, fail: bool) {
        self.fail_ticket_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn ticket_count(&self) -> usize {
        self.tables.lock().tickets.len()
    }

    fn event_write_error(&self) -> Option<AppError> {
        self.fail_event_updates
            .load(Ordering::SeqCst)
            .then(|| AppError::PersistenceError {
                entity: "event",
                source: sqlx::Error::Protocol("event writes disabled".into()),
            })
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn save(&self, event: NewEvent) -> Result<Event> {
        if let Some(err) = self.event_write_error() {
            return Err(err);
        }

        let mut tables = self.tables.lock();
        if let Some(series_id) = event.series_id {
            if !tables.series.contains_key(&series_id) {
                return Err(AppError::not_found("series", series_id));
            }
        }

        let now = Utc::now();
        let saved = Event {
            id: tables.next_id(),
            organizer_id: event.organizer_id,
            series_id: event.series_id,
            name: event.name,
            description: event.description,
            location: event.location,
            created_at: now,
            updated_at: now,
            tickets: Vec::new(),
        };
        tables.events.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        Ok(self.tables.lock().event_with_tickets(id))
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Ticket>> {
        Ok(self.tables.lock().tickets.get(&id).cloned())
    }

    async fn find_all_by_event_id(&self, event_id: i64) -> Result<Vec<Ticket>> {
        Ok(self
            .tables
            .lock()
            .tickets
            .values()
            .filter(|t| t.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn save_for_event(&self, event: &Event, ticket: NewTicket) -> Result<(Ticket, Event)> {
        let mut tables = self.tables.lock();
        if !tables.events.contains_key(&event.id) {
            return Err(AppError::not_found("event", event.id));
        }
        // Checked before any write so a failure leaves nothing behind.
        if let Some(err) = self.event_write_error() {
            return Err(err);
        }
        if self.fail_ticket_inserts.load(Ordering::SeqCst) {
            return Err(AppError::PersistenceError {
                entity: "ticket",
                source: sqlx::Error::Protocol("ticket inserts disabled".into()),
            });
        }

        let now = Utc::now();
        let saved = Ticket {
            id: tables.next_id(),
            event_id: event.id,
            ticket_type: ticket.ticket_type,
            name: ticket.name,
            stock: ticket.stock,
            number_available: ticket.number_available,
            price: ticket.price,
            discount_code: ticket.discount_code,
            discount_price: ticket.discount_price,
            percentage: ticket.percentage,
            purchase_limit: ticket.purchase_limit,
            available_discounted_tickets: ticket.available_discounted_tickets,
            created_at: now,
            updated_at: now,
        };
        tables.tickets.insert(saved.id, saved.clone());
        if let Some(stored) = tables.events.get_mut(&event.id) {
            stored.updated_at = now;
        }

        let persisted = tables
            .event_with_tickets(event.id)
            .ok_or_else(|| AppError::not_found("event", event.id))?;
        Ok((saved, persisted))
    }
}

#[async_trait]
impl SeriesRepository for InMemoryStore {
    async fn save(&self, series: NewSeries) -> Result<Series> {
        let mut tables = self.tables.lock();
        let now = Utc::now();
        let saved = Series {
            id: tables.next_id(),
            organizer_id: series.organizer_id,
            name: series.name,
            description: series.description,
            is_public: series.is_public,
            created_at: now,
            updated_at: now,
            events: Vec::new(),
        };
        tables.series.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Series>> {
        Ok(self.tables.lock().series_with_events(id))
    }

    async fn find_public_by_id(&self, id: i64) -> Result<Option<Series>> {
        Ok(self
            .tables
            .lock()
            .series_with_events(id)
            .filter(|s| s.is_public))
    }

    async fn add_event(&self, series_id: i64, event_id: i64) -> Result<Series> {
        if let Some(err) = self.event_write_error() {
            return Err(err);
        }

        let mut tables = self.tables.lock();
        if !tables.series.contains_key(&series_id) {
            return Err(AppError::not_found("series", series_id));
        }
        let now = Utc::now();
        let event = tables
            .events
            .get_mut(&event_id)
            .ok_or_else(|| AppError::not_found("event", event_id))?;
        event.series_id = Some(series_id);
        event.updated_at = now;

        tables
            .series_with_events(series_id)
            .ok_or_else(|| AppError::not_found("series", series_id))
    }
}
