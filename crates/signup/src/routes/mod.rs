//! HTTP route handlers for the signup service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /              - Plain-text greeting
//! GET  /signup        - Signup form
//! POST /signup        - Create an account
//! GET  /health        - Liveness probe
//! GET  /health/ready  - Readiness probe (checks the store)
//! ```

pub mod health;
pub mod signup;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the signup service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(signup::home))
        .route("/signup", get(signup::signup_page).post(signup::signup))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
