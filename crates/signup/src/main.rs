//! Pronto Pizza Signup - user registration service.
//!
//! This binary serves the public signup endpoint on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework serving the signup form and endpoint
//! - Askama template for the signup form
//! - `PostgreSQL` for account storage (unique email index)
//! - bcrypt for password hashing, offloaded to the blocking pool
//!
//! # Startup behavior
//!
//! The database pool connects lazily: the initial connectivity check logs
//! success or failure but never aborts the process. Migrations run only
//! when that check succeeds; with the database down, requests surface
//! storage failures as 500s until it comes back.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pronto_signup::config::SignupConfig;
use pronto_signup::db::{self, PgAccountStore};
use pronto_signup::routes;
use pronto_signup::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &SignupConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = SignupConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pronto_signup=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Lazy database pool; only URL parsing can fail here
    let pool = db::create_pool(&config.database_url).expect("Invalid database URL");

    // Log the initial connection outcome without aborting on failure
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => {
            tracing::info!("Database connection succeeded");
            if let Err(e) = sqlx::migrate!().run(&pool).await {
                tracing::error!(error = %e, "Failed to run migrations");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Error in database connection");
        }
    }

    // Build application state with the injected store
    let store = PgAccountStore::new(pool);
    let state = AppState::new(config.clone(), Arc::new(store));

    // Build router
    let app = routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("signup service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
