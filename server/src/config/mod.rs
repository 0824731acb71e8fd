use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::apply_security_headers;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/rave";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_JWT_TTL_SECS: u64 = 86_400;
const DEFAULT_OAUTH_STATE_TTL_SECS: u64 = 600;
const DEFAULT_REDIRECT_URL: &str = "http://localhost:8000/auth/google/callback";
const DEFAULT_FRONTEND_TOKEN_URL: &str = "http://localhost:5173/validate-token";
const DEFAULT_QUEUE_CAPACITY: usize = 256;
const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_NOTIFIER_CONCURRENCY: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub port: u16,
    pub production: bool,
    pub allowed_origins: Option<String>,
    pub auth: AuthConfig,
    pub google: GoogleConfig,
    pub notifier: NotifierConfig,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub state_ttl: Duration,
    /// Frontend page that receives the issued token after a Google login.
    pub frontend_token_url: String,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl GoogleConfig {
    pub const AUTH_URL: &'static str = "https://accounts.google.com/o/oauth2/v2/auth";
    pub const TOKEN_URL: &'static str = "https://oauth2.googleapis.com/token";
    pub const USERINFO_URL: &'static str = "https://www.googleapis.com/oauth2/v2/userinfo";

    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_url,
            auth_url: Self::AUTH_URL.to_string(),
            token_url: Self::TOKEN_URL.to_string(),
            userinfo_url: Self::USERINFO_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Webhook receiving new-ticket messages. `None` disables delivery.
    pub ticket_service_url: Option<String>,
    pub queue_capacity: usize,
    pub max_retries: usize,
    /// Deliveries in flight at once, so one slow endpoint call does not
    /// hold up the rest of the queue.
    pub concurrency: usize,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            ticket_service_url: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_retries: DEFAULT_MAX_RETRIES,
            concurrency: DEFAULT_NOTIFIER_CONCURRENCY,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let google = GoogleConfig::new(
            required("GOOGLE_CLIENT_ID")?,
            required("GOOGLE_CLIENT_SECRET")?,
            env::var("GOOGLE_REDIRECT_URL").unwrap_or_else(|_| DEFAULT_REDIRECT_URL.to_string()),
        );

        let notifier = NotifierConfig {
            ticket_service_url: env::var("TICKET_SERVICE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            queue_capacity: parsed("NOTIFIER_QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY)?,
            max_retries: parsed("NOTIFIER_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            concurrency: parsed("NOTIFIER_CONCURRENCY", DEFAULT_NOTIFIER_CONCURRENCY)?,
            ..NotifierConfig::default()
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: parsed("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            port: parsed("PORT", DEFAULT_PORT)?,
            production: env::var("RUST_ENV")
                .map(|v| v.to_lowercase() == "production")
                .unwrap_or(false),
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
            auth: AuthConfig {
                jwt_secret: required("JWT_SECRET")?,
                token_ttl: Duration::from_secs(parsed("JWT_TTL_SECS", DEFAULT_JWT_TTL_SECS)?),
                state_ttl: Duration::from_secs(parsed(
                    "OAUTH_STATE_TTL_SECS",
                    DEFAULT_OAUTH_STATE_TTL_SECS,
                )?),
                frontend_token_url: env::var("FRONTEND_TOKEN_URL")
                    .unwrap_or_else(|_| DEFAULT_FRONTEND_TOKEN_URL.to_string()),
            },
            google,
            notifier,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_falls_back_to_default() {
        std::env::remove_var("RAVE_TEST_UNSET_NUMBER");
        let value: u16 = parsed("RAVE_TEST_UNSET_NUMBER", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parsed_rejects_garbage() {
        std::env::set_var("RAVE_TEST_BAD_NUMBER", "not-a-number");
        let result: Result<u16, _> = parsed("RAVE_TEST_BAD_NUMBER", 1);
        assert!(matches!(result, Err(ConfigError::Invalid { name: "RAVE_TEST_BAD_NUMBER", .. })));
    }

    #[test]
    fn test_required_treats_blank_as_missing() {
        std::env::set_var("RAVE_TEST_BLANK", "   ");
        assert!(matches!(
            required("RAVE_TEST_BLANK"),
            Err(ConfigError::Missing("RAVE_TEST_BLANK"))
        ));
    }

    #[test]
    fn test_google_config_uses_public_endpoints() {
        let google = GoogleConfig::new("id".into(), "secret".into(), DEFAULT_REDIRECT_URL.into());
        assert_eq!(google.auth_url, GoogleConfig::AUTH_URL);
        assert_eq!(google.userinfo_url, GoogleConfig::USERINFO_URL);
    }
}
