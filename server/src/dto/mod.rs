//! Request and response shapes of the HTTP API, with explicit mappings
//! to and from the persisted models.

pub mod request;
pub mod response;

pub use request::{
    CreateEventRequest, CreateSeriesRequest, CreateTicketRequest, OAuthCallbackQuery,
};
pub use response::{EventResponse, SeriesResponse, TicketResponse};
