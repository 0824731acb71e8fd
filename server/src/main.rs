use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use rave_server::auth::{GoogleOAuthProvider, OAuthService, TokenIssuer};
use rave_server::config::Config;
use rave_server::repositories::{PgEventRepository, PgSeriesRepository, PgTicketRepository};
use rave_server::routes::{create_routes, RouterOptions};
use rave_server::services::TicketNotifier;
use rave_server::AppState;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    tracing::info!("Successfully connected to database");

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Migrations run successfully");

    let http_client = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("rave-server/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let (notifier, worker) = TicketNotifier::spawn(&config.notifier, http_client.clone());

    let oauth = OAuthService::new(
        Arc::new(GoogleOAuthProvider::new(config.google.clone(), http_client)),
        TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl),
        config.auth.state_ttl,
        config.auth.frontend_token_url.clone(),
    );

    let state = AppState::new(
        Arc::new(PgEventRepository::new(pool.clone())),
        Arc::new(PgTicketRepository::new(pool.clone())),
        Arc::new(PgSeriesRepository::new(pool.clone())),
        oauth,
        notifier,
    );

    let app = create_routes(
        state,
        &RouterOptions {
            allowed_origins: config.allowed_origins.clone(),
            include_hsts: config.production,
        },
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router and every notifier handle are gone; let the worker drain.
    if let Some(worker) = worker {
        if tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await.is_err() {
            tracing::warn!("Notification worker did not drain before shutdown");
        }
    }
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
