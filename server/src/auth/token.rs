use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{Role, User};
use crate::utils::{AppError, Result};

const ISSUER: &str = "rave";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Mints and verifies the service's own HS256 access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user.username.clone(),
            role: user.role,
            iss: ISSUER.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("failed to generate access token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<User> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AppError::AuthError(format!("invalid access token: {e}")))?;

        Ok(User {
            username: data.claims.sub,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_verifies_to_same_user() {
        let issuer = TokenIssuer::new("test-secret", Duration::from_secs(3600));
        let user = User::new("ada@example.com");

        let token = issuer.issue(&user).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), user);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let ours = TokenIssuer::new("test-secret", Duration::from_secs(3600));
        let theirs = TokenIssuer::new("other-secret", Duration::from_secs(3600));

        let token = theirs.issue(&User::new("mallory@example.com")).unwrap();
        assert!(matches!(ours.verify(&token), Err(AppError::AuthError(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issuer = TokenIssuer::new("test-secret", Duration::from_secs(3600));
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "late@example.com".into(),
            role: Role::User,
            iss: ISSUER.into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap();

        assert!(issuer.verify(&token).is_err());
    }
}
