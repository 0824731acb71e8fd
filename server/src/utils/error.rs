use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// OAuth callback carried a state token this server never issued,
    /// already consumed, or that expired.
    #[error("OAuth state mismatch")]
    StateMismatch,

    #[error("Code-token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("User data fetch failed: {0}")]
    UserInfoFailed(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Failed to save {entity}")]
    PersistenceError {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        AppError::NotFound(format!("{} with id {} not found", entity, id))
    }

    pub fn persistence(entity: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| AppError::PersistenceError { entity, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StateMismatch
            | AppError::TokenExchangeFailed(_)
            | AppError::UserInfoFailed(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) | AppError::PersistenceError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::StateMismatch => "STATE_MISMATCH",
            AppError::TokenExchangeFailed(_) => "TOKEN_EXCHANGE_FAILED",
            AppError::UserInfoFailed(_) => "USER_INFO_FAILED",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::PersistenceError { .. } => "PERSISTENCE_ERROR",
            AppError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => {
                warn!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::StateMismatch => {
                warn!(code = self.code(), "OAuth callback state did not match an issued state");
            }
            AppError::TokenExchangeFailed(msg)
            | AppError::UserInfoFailed(msg)
            | AppError::ExternalServiceError(msg)
            | AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::PersistenceError { entity, source } => {
                error!(entity = *entity, error = ?source, "Persistence error");
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::StateMismatch => "States don't match".to_string(),
            AppError::TokenExchangeFailed(_) => "Code-token exchange failed".to_string(),
            AppError::UserInfoFailed(_) => "User data fetch failed".to_string(),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::PersistenceError { entity, .. } => format!("Failed to save {}", entity),
            AppError::ExternalServiceError(_) => "An upstream service failed".to_string(),
            AppError::InternalServerError(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Only expose high-level message to the client
        let public_message = self.public_message();

        error_response(code, public_message, None, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oauth_failures_are_client_errors() {
        assert_eq!(AppError::StateMismatch.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::TokenExchangeFailed("boom".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UserInfoFailed("boom".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_persistence_error_hides_driver_details() {
        let err = AppError::persistence("ticket")(sqlx::Error::Protocol("secret detail".into()));
        assert_eq!(err.code(), "PERSISTENCE_ERROR");
        assert_eq!(err.public_message(), "Failed to save ticket");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let err = AppError::not_found("event", 42);
        assert_eq!(err.public_message(), "event with id 42 not found");
    }
}
