pub mod event;
pub mod notification;
pub mod series;
pub mod ticket;

pub use event::EventService;
pub use notification::{NewTicketMessage, NotifierStats, TicketNotifier};
pub use series::SeriesService;
pub use ticket::TicketService;
