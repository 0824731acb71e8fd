use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::provider::OAuthProvider;
use super::state::OAuthStateStore;
use super::token::TokenIssuer;
use crate::models::User;
use crate::utils::{AppError, Result};

/// Progress of one Google login, from issuing the redirect to handing the
/// frontend a local token. Any failure halts the flow; the caller restarts
/// from `AwaitingRedirect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    AwaitingRedirect,
    AwaitingCallback,
    TokenExchanged,
    UserResolved,
    LocalTokenIssued,
}

pub struct OAuthService {
    provider: Arc<dyn OAuthProvider>,
    states: OAuthStateStore,
    tokens: TokenIssuer,
    frontend_token_url: String,
}

impl OAuthService {
    pub fn new(
        provider: Arc<dyn OAuthProvider>,
        tokens: TokenIssuer,
        state_ttl: Duration,
        frontend_token_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            states: OAuthStateStore::new(state_ttl),
            tokens,
            frontend_token_url: frontend_token_url.into(),
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Start a login: returns the provider URL with a fresh state token.
    pub fn begin_login(&self) -> Result<String> {
        let state = self.states.issue();
        let url = self.provider.authorization_url(&state)?;
        debug!(
            from = ?LoginStage::AwaitingRedirect,
            to = ?LoginStage::AwaitingCallback,
            pending = self.states.pending(),
            "Login redirect issued"
        );
        Ok(url)
    }

    /// Finish a login from the provider callback. Returns the frontend URL
    /// carrying the newly issued access token.
    pub async fn complete_login(&self, state: &str, code: &str) -> Result<String> {
        if !self.states.consume(state) {
            warn!(stage = ?LoginStage::AwaitingCallback, "Callback state rejected");
            return Err(AppError::StateMismatch);
        }

        let access_token = self.provider.exchange_code(code).await?;
        debug!(stage = ?LoginStage::TokenExchanged, "Authorization code exchanged");

        let profile = self.provider.fetch_user_info(&access_token).await?;
        if profile.email.trim().is_empty() {
            return Err(AppError::UserInfoFailed("provider returned no email".into()));
        }
        let user = User::new(profile.email);
        debug!(stage = ?LoginStage::UserResolved, user = %user.username, "Provider user resolved");

        let token = self.tokens.issue(&user)?;
        info!(stage = ?LoginStage::LocalTokenIssued, user = %user.username, role = %user.role, "Login completed");

        Ok(token_redirect(&self.frontend_token_url, &token))
    }
}

fn token_redirect(base: &str, token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}token={token}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::provider::ProviderUser;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OAuthProvider for CountingProvider {
        fn authorization_url(&self, state: &str) -> Result<String> {
            Ok(format!("https://provider.test/auth?state={state}"))
        }

        async fn exchange_code(&self, code: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if code == "bad" {
                return Err(AppError::TokenExchangeFailed("rejected".into()));
            }
            Ok("provider-token".into())
        }

        async fn fetch_user_info(&self, _access_token: &str) -> Result<ProviderUser> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProviderUser {
                email: "ada@example.com".into(),
                verified_email: true,
                name: None,
                picture: None,
            })
        }
    }

    fn service(provider: Arc<CountingProvider>) -> OAuthService {
        OAuthService::new(
            provider,
            TokenIssuer::new("test-secret", Duration::from_secs(60)),
            Duration::from_secs(60),
            "http://localhost:5173/validate-token",
        )
    }

    fn state_of(url: &str) -> String {
        url.split("state=").nth(1).unwrap().to_string()
    }

    #[tokio::test]
    async fn test_mismatched_state_makes_no_provider_call() {
        let provider = Arc::new(CountingProvider::default());
        let service = service(provider.clone());
        let _ = service.begin_login().unwrap();

        let result = service.complete_login("forged", "code").await;
        assert!(matches!(result, Err(AppError::StateMismatch)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_login_redirects_with_token() {
        let provider = Arc::new(CountingProvider::default());
        let service = service(provider.clone());
        let state = state_of(&service.begin_login().unwrap());

        let redirect = service.complete_login(&state, "good").await.unwrap();
        let token = redirect
            .strip_prefix("http://localhost:5173/validate-token?token=")
            .unwrap();
        assert_eq!(service.tokens().verify(token).unwrap().username, "ada@example.com");

        // The same state cannot be replayed.
        assert!(matches!(
            service.complete_login(&state, "good").await,
            Err(AppError::StateMismatch)
        ));
    }

    #[tokio::test]
    async fn test_exchange_failure_halts_before_user_fetch() {
        let provider = Arc::new(CountingProvider::default());
        let service = service(provider.clone());
        let state = state_of(&service.begin_login().unwrap());

        let result = service.complete_login(&state, "bad").await;
        assert!(matches!(result, Err(AppError::TokenExchangeFailed(_))));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_token_redirect_appends_to_existing_query() {
        assert_eq!(token_redirect("https://app/t?x=1", "abc"), "https://app/t?x=1&token=abc");
        assert_eq!(token_redirect("https://app/t", "abc"), "https://app/t?token=abc");
    }
}
