use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{NewEvent, NewSeries, NewTicket};
use crate::utils::AppError;

/// Largest value a `NUMERIC(12, 2)` price column holds.
fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub event_id: i64,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub name: String,
    pub stock: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub discount_code: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub percentage: Option<Decimal>,
    #[serde(default)]
    pub purchase_limit: Option<i32>,
    #[serde(default)]
    pub available_discounted_tickets: Option<i32>,
}

impl CreateTicketRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let invalid = |msg: &str| Err(AppError::ValidationError(msg.to_string()));

        if self.ticket_type.trim().is_empty() {
            return invalid("ticket type is required");
        }
        if self.name.trim().is_empty() {
            return invalid("ticket name is required");
        }
        if self.stock < 0 {
            return invalid("stock cannot be negative");
        }
        if self.price.is_sign_negative() {
            return invalid("price cannot be negative");
        }
        if self.price > max_price() {
            return invalid("price exceeds the maximum of 9999999999.99");
        }
        if let Some(limit) = self.purchase_limit {
            if limit < 1 || limit > self.stock {
                return invalid("purchase limit must be between 1 and stock");
            }
        }
        if let Some(discount_price) = self.discount_price {
            if discount_price.is_sign_negative() || discount_price > self.price {
                return invalid("discount price must be between 0 and price");
            }
        }
        if let Some(percentage) = self.percentage {
            if percentage.is_sign_negative() || percentage > Decimal::ONE_HUNDRED {
                return invalid("percentage must be between 0 and 100");
            }
        }
        let has_discount = self.discount_price.is_some() || self.percentage.is_some();
        if has_discount && self.discount_code.as_deref().map_or(true, |c| c.trim().is_empty()) {
            return invalid("a discount requires a discount code");
        }
        if let Some(discounted) = self.available_discounted_tickets {
            if discounted < 0 || discounted > self.stock {
                return invalid("discounted tickets must be between 0 and stock");
            }
        }
        Ok(())
    }
}

impl From<CreateTicketRequest> for NewTicket {
    fn from(request: CreateTicketRequest) -> Self {
        NewTicket {
            ticket_type: request.ticket_type,
            name: request.name,
            stock: request.stock,
            number_available: request.stock,
            price: request.price,
            discount_code: request.discount_code,
            discount_price: request.discount_price,
            percentage: request.percentage,
            purchase_limit: request.purchase_limit.unwrap_or(request.stock),
            available_discounted_tickets: request.available_discounted_tickets.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: String,
    #[serde(default)]
    pub organizer_id: Option<i64>,
    #[serde(default)]
    pub series_id: Option<i64>,
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError("event name is required".into()));
        }
        if self.location.trim().is_empty() {
            return Err(AppError::ValidationError("event location is required".into()));
        }
        Ok(())
    }
}

impl From<CreateEventRequest> for NewEvent {
    fn from(request: CreateEventRequest) -> Self {
        NewEvent {
            organizer_id: request.organizer_id,
            series_id: request.series_id,
            name: request.name,
            description: request.description,
            location: request.location,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSeriesRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub organizer_id: Option<i64>,
}

impl CreateSeriesRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError("series name is required".into()));
        }
        Ok(())
    }
}

impl From<CreateSeriesRequest> for NewSeries {
    fn from(request: CreateSeriesRequest) -> Self {
        NewSeries {
            organizer_id: request.organizer_id,
            name: request.name,
            description: request.description,
            is_public: request.is_public,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackQuery {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub code: String,
}
