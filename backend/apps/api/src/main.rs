//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::sync::Arc;
use std::time::Duration;

use auth::{PgUserRepository, SweepExpiredSignupsUseCase, require_access_token, users_router};
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
};
use feed::{PgFeedRepository, feed_router};
use platform::mail::MailTransport;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

const SWEEP_PERIOD: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,feed=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    tracing::info!(env = ?config.env, "Configuration loaded");

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.database_acquire_timeout)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Expired sign-ups: once now, then hourly. Errors never stop the server.
    let sweeper = SweepExpiredSignupsUseCase::new(Arc::new(PgUserRepository::new(pool.clone())));
    tokio::spawn(sweeper.run_every(SWEEP_PERIOD));

    let mailer = MailTransport::from_config(config.mail_relay.clone());
    if matches!(mailer, MailTransport::Log(_)) {
        tracing::warn!("MAIL_RELAY_URL not set, e-mails will only be logged");
    }

    let auth_config = Arc::new(config.auth);

    // CORS configuration: the frontend sends the refresh cookie, so one
    // explicit origin with credentials
    let frontend_origin: http::HeaderValue = auth_config.public_frontend_url.parse()?;

    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let protected = feed_router(PgFeedRepository::new(pool.clone()), config.feed).route_layer(
        middleware::from_fn_with_state(auth_config.clone(), require_access_token),
    );

    // Build router
    let app = Router::new()
        .nest(
            "/users",
            users_router(PgUserRepository::new(pool.clone()), mailer, auth_config),
        )
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
