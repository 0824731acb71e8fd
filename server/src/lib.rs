//! Rave organizer service: events, tickets and series behind an HTTP API,
//! Google sign-in, and new-ticket notifications to the ticket service.

pub mod auth;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
pub use utils::{AppError, Result};
