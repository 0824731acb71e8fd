//! Google login and the service's own access tokens.

pub mod extractor;
pub mod provider;
pub mod service;
pub mod state;
pub mod token;

pub use extractor::AuthUser;
pub use provider::{GoogleOAuthProvider, OAuthProvider, ProviderUser};
pub use service::{LoginStage, OAuthService};
pub use state::OAuthStateStore;
pub use token::{Claims, TokenIssuer};
