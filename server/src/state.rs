use std::sync::Arc;

use crate::auth::OAuthService;
use crate::repositories::{EventRepository, SeriesRepository, TicketRepository};
use crate::services::{EventService, SeriesService, TicketNotifier, TicketService};

/// Everything the handlers need, cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub tickets: TicketService,
    pub events: EventService,
    pub series: SeriesService,
    pub oauth: Arc<OAuthService>,
    pub notifier: TicketNotifier,
}

impl AppState {
    pub fn new(
        events: Arc<dyn EventRepository>,
        tickets: Arc<dyn TicketRepository>,
        series: Arc<dyn SeriesRepository>,
        oauth: OAuthService,
        notifier: TicketNotifier,
    ) -> Self {
        Self {
            tickets: TicketService::new(tickets, events.clone(), notifier.clone()),
            events: EventService::new(events),
            series: SeriesService::new(series),
            oauth: Arc::new(oauth),
            notifier,
        }
    }
}
