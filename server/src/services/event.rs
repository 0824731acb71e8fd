use std::sync::Arc;

use tracing::info;

use crate::dto::{CreateEventRequest, EventResponse};
use crate::models::NewEvent;
use crate::repositories::EventRepository;
use crate::utils::{AppError, Result};

#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    pub async fn create_event(&self, request: CreateEventRequest) -> Result<EventResponse> {
        request.validate()?;

        let saved = self.events.save(NewEvent::from(request)).await?;
        info!(event_id = saved.id, series_id = ?saved.series_id, "Event created");
        Ok(EventResponse::from(&saved))
    }

    pub async fn get_event(&self, id: i64) -> Result<EventResponse> {
        self.events
            .find_by_id(id)
            .await?
            .map(|event| EventResponse::from(&event))
            .ok_or_else(|| AppError::not_found("event", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::InMemoryStore;

    fn service() -> EventService {
        EventService::new(Arc::new(InMemoryStore::new()))
    }

    fn request(name: &str, series_id: Option<i64>) -> CreateEventRequest {
        CreateEventRequest {
            name: name.into(),
            description: Some("Afrobeats all night".into()),
            location: "Eko Hotel".into(),
            organizer_id: Some(3),
            series_id,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();
        let created = service.create_event(request("Rave One", None)).await.unwrap();

        let fetched = service.get_event(created.id).await.unwrap();
        assert_eq!(fetched.name, "Rave One");
        assert_eq!(fetched.organizer_id, Some(3));
        assert!(fetched.tickets.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_series_is_not_found() {
        let result = service().create_event(request("Orphan", Some(77))).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let result = service().create_event(request(" ", None)).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
