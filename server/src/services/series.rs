use std::sync::Arc;

use tracing::info;

use crate::dto::{CreateSeriesRequest, SeriesResponse};
use crate::models::NewSeries;
use crate::repositories::SeriesRepository;
use crate::utils::{AppError, Result};

#[derive(Clone)]
pub struct SeriesService {
    series: Arc<dyn SeriesRepository>,
}

impl SeriesService {
    pub fn new(series: Arc<dyn SeriesRepository>) -> Self {
        Self { series }
    }

    pub async fn create_series(&self, request: CreateSeriesRequest) -> Result<SeriesResponse> {
        request.validate()?;

        let saved = self.series.save(NewSeries::from(request)).await?;
        info!(series_id = saved.id, public = saved.is_public, "Series created");
        Ok(SeriesResponse::from(&saved))
    }

    pub async fn get_series(&self, id: i64) -> Result<SeriesResponse> {
        self.series
            .find_by_id(id)
            .await?
            .map(|series| SeriesResponse::from(&series))
            .ok_or_else(|| AppError::not_found("series", id))
    }

    /// Private series answer `NotFound` here, same as missing ones.
    pub async fn get_public_series(&self, id: i64) -> Result<SeriesResponse> {
        self.series
            .find_public_by_id(id)
            .await?
            .map(|series| SeriesResponse::from(&series))
            .ok_or_else(|| AppError::not_found("series", id))
    }

    pub async fn add_event_to_series(&self, series_id: i64, event_id: i64) -> Result<SeriesResponse> {
        let series = self.series.add_event(series_id, event_id).await?;
        info!(series_id, event_id, "Event added to series");
        Ok(SeriesResponse::from(&series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewEvent;
    use crate::repositories::memory::InMemoryStore;
    use crate::repositories::EventRepository;

    fn request(name: &str, is_public: bool) -> CreateSeriesRequest {
        CreateSeriesRequest {
            name: name.into(),
            description: None,
            is_public,
            organizer_id: None,
        }
    }

    #[tokio::test]
    async fn test_public_lookup_hides_private_series() {
        let service = SeriesService::new(Arc::new(InMemoryStore::new()));
        let private = service.create_series(request("Members only", false)).await.unwrap();
        let public = service.create_series(request("Open air", true)).await.unwrap();

        assert!(service.get_series(private.id).await.is_ok());
        assert!(matches!(
            service.get_public_series(private.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(service.get_public_series(public.id).await.unwrap().name, "Open air");
    }

    #[tokio::test]
    async fn test_add_event_to_series() {
        let store = InMemoryStore::new();
        let service = SeriesService::new(Arc::new(store.clone()));
        let series = service.create_series(request("Summer", true)).await.unwrap();

        let events: Arc<dyn EventRepository> = Arc::new(store);
        let event = events
            .save(NewEvent {
                organizer_id: None,
                series_id: None,
                name: "Beach party".into(),
                description: None,
                location: "Tarkwa Bay".into(),
            })
            .await
            .unwrap();

        let updated = service.add_event_to_series(series.id, event.id).await.unwrap();
        assert_eq!(updated.events.len(), 1);
        assert_eq!(updated.events[0].series_id, Some(series.id));

        assert!(matches!(
            service.add_event_to_series(series.id, 9_999).await,
            Err(AppError::NotFound(_))
        ));
    }
}
