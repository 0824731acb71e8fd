pub mod event;
pub mod series;
pub mod ticket;
pub mod user;

pub use event::{Event, NewEvent};
pub use series::{NewSeries, Series};
pub use ticket::{NewTicket, Ticket};
pub use user::{Role, User};
