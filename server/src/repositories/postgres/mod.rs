//! PostgreSQL repositories over a shared `PgPool`.

mod event;
mod series;
mod ticket;

pub use event::PgEventRepository;
pub use series::PgSeriesRepository;
pub use ticket::PgTicketRepository;

const EVENT_COLUMNS: &str =
    "id, organizer_id, series_id, name, description, location, created_at, updated_at";

const TICKET_COLUMNS: &str = "id, event_id, ticket_type, name, stock, number_available, price, \
     discount_code, discount_price, percentage, purchase_limit, available_discounted_tickets, \
     created_at, updated_at";

const SERIES_COLUMNS: &str =
    "id, organizer_id, name, description, is_public, created_at, updated_at";
