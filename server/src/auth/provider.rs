use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::GoogleConfig;
use crate::utils::{AppError, Result};

/// Profile returned by the provider's user-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderUser {
    pub email: String,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// URL the browser is sent to, carrying `state` verbatim.
    fn authorization_url(&self, state: &str) -> Result<String>;

    /// Exchange an authorization code for a provider access token.
    async fn exchange_code(&self, code: &str) -> Result<String>;

    async fn fetch_user_info(&self, access_token: &str) -> Result<ProviderUser>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Clone)]
pub struct GoogleOAuthProvider {
    config: GoogleConfig,
    http_client: Client,
}

impl GoogleOAuthProvider {
    pub fn new(config: GoogleConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthProvider {
    fn authorization_url(&self, state: &str) -> Result<String> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", "openid email profile"),
            ("access_type", "offline"),
            ("state", state),
        ];
        let query = serde_urlencoded::to_string(params)
            .map_err(|e| AppError::InternalServerError(format!("failed to build auth url: {e}")))?;

        Ok(format!("{}?{}", self.config.auth_url, query))
    }

    async fn exchange_code(&self, code: &str) -> Result<String> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::TokenExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "Google token exchange rejected");
            return Err(AppError::TokenExchangeFailed(format!("provider returned {status}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::TokenExchangeFailed(e.to_string()))?;
        Ok(token.access_token)
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<ProviderUser> {
        let response = self
            .http_client
            .get(&self.config.userinfo_url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| AppError::UserInfoFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::UserInfoFailed(format!(
                "provider returned {}",
                response.status()
            )));
        }

        response
            .json::<ProviderUser>()
            .await
            .map_err(|e| AppError::UserInfoFailed(format!("error extracting user data: {e}")))
    }
}
