//! Outbound new-ticket notifications.
//!
//! Ticket creation hands a [`NewTicketMessage`] to [`TicketNotifier::notify`],
//! which never blocks the request. A worker drains the bounded queue and
//! posts each message to the ticket service, a few deliveries at a time,
//! retrying with exponential backoff. Messages that still fail are logged
//! and dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::config::NotifierConfig;
use crate::dto::TicketResponse;
use crate::models::Event;
use crate::utils::{AppError, Result};

/// Denormalized ticket + event snapshot sent to the ticket service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicketMessage {
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
    pub purchase_limit: i32,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub percentage: Option<Decimal>,
    pub available_discounted_tickets: i32,
    pub event_name: String,
    pub description: Option<String>,
    pub location: String,
}

impl NewTicketMessage {
    pub fn new(event: &Event, ticket: &TicketResponse) -> Self {
        Self {
            ticket_type: ticket.ticket_type.clone(),
            name: ticket.name.clone(),
            stock: ticket.stock,
            number_available: ticket.number_available,
            price: ticket.price,
            discount_code: ticket.discount_code.clone(),
            discount_price: ticket.discount_price,
            purchase_limit: ticket.purchase_limit,
            percentage: ticket.percentage,
            available_discounted_tickets: ticket.available_discounted_tickets,
            event_name: event.name.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NotifierStats {
    pub enqueued: u64,
    pub delivered: u64,
    pub failed: u64,
    /// Not queued: queue full, worker gone, or no endpoint configured.
    pub rejected: u64,
}

#[derive(Debug, Default)]
struct Counters {
    enqueued: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    rejected: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> NotifierStats {
        NotifierStats {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Exponential backoff: `initial * 2^attempt`, capped at `max`.
#[derive(Debug, Clone)]
struct Backoff {
    max_retries: usize,
    initial: Duration,
    max: Duration,
}

impl Backoff {
    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(31) as u32);
        self.initial.saturating_mul(factor).min(self.max)
    }
}

#[derive(Clone)]
pub struct TicketNotifier {
    sender: Option<mpsc::Sender<NewTicketMessage>>,
    counters: Arc<Counters>,
}

impl TicketNotifier {
    /// Start the delivery worker. The worker exits once every handle has
    /// been dropped and the queue is drained.
    pub fn spawn(config: &NotifierConfig, client: reqwest::Client) -> (Self, Option<JoinHandle<()>>) {
        let Some(url) = config.ticket_service_url.clone() else {
            info!("TICKET_SERVICE_URL not set, ticket notifications disabled");
            return (Self::disabled(), None);
        };

        let counters = Arc::new(Counters::default());
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let worker = Worker {
            client,
            url,
            backoff: Backoff {
                max_retries: config.max_retries,
                initial: config.initial_backoff,
                max: config.max_backoff,
            },
            counters: counters.clone(),
        };
        let handle = tokio::spawn(worker.run(receiver, config.concurrency.max(1)));

        (
            Self {
                sender: Some(sender),
                counters,
            },
            Some(handle),
        )
    }

    pub fn disabled() -> Self {
        Self {
            sender: None,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn notify(&self, message: NewTicketMessage) {
        let Some(sender) = &self.sender else {
            debug!(ticket = %message.name, "Ticket notifications disabled, skipping");
            Counters::bump(&self.counters.rejected);
            return;
        };

        match sender.try_send(message) {
            Ok(()) => Counters::bump(&self.counters.enqueued),
            Err(mpsc::error::TrySendError::Full(message)) => {
                warn!(ticket = %message.name, event = %message.event_name, "Notification queue full, dropping message");
                Counters::bump(&self.counters.rejected);
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                error!(ticket = %message.name, event = %message.event_name, "Notification worker stopped, dropping message");
                Counters::bump(&self.counters.rejected);
            }
        }
    }

    pub fn stats(&self) -> NotifierStats {
        self.counters.snapshot()
    }
}

struct Worker {
    client: reqwest::Client,
    url: String,
    backoff: Backoff,
    counters: Arc<Counters>,
}

impl Worker {
    async fn run(self, mut receiver: mpsc::Receiver<NewTicketMessage>, concurrency: usize) {
        info!(url = %self.url, concurrency, "Ticket notification worker started");
        let worker = Arc::new(self);
        let mut in_flight = JoinSet::new();

        while let Some(message) = receiver.recv().await {
            while in_flight.len() >= concurrency {
                in_flight.join_next().await;
            }
            let worker = worker.clone();
            in_flight.spawn(async move { worker.deliver(message).await });
        }

        while in_flight.join_next().await.is_some() {}
        info!("Ticket notification worker stopped");
    }

    async fn deliver(&self, message: NewTicketMessage) {
        let mut attempt = 0;
        loop {
            match self.post(&message).await {
                Ok(()) => {
                    debug!(ticket = %message.name, attempt, "Ticket notification delivered");
                    Counters::bump(&self.counters.delivered);
                    return;
                }
                Err(e) if attempt < self.backoff.max_retries => {
                    let delay = self.backoff.delay_for_attempt(attempt);
                    warn!(ticket = %message.name, attempt, ?delay, error = %e, "Ticket notification failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        ticket = %message.name,
                        event = %message.event_name,
                        attempts = attempt + 1,
                        error = %e,
                        "Ticket notification dropped after retries"
                    );
                    Counters::bump(&self.counters.failed);
                    return;
                }
            }
        }
    }

    async fn post(&self, message: &NewTicketMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(message)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "ticket service responded with {}",
                response.status()
            )));
        }
        Ok(())
    }
}
