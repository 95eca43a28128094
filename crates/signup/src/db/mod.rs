//! Storage layer for the signup service.
//!
//! # Tables
//!
//! - `account` - One row per registered user. The `email` column carries a
//!   unique index; a violation of that index is the authoritative duplicate
//!   signal, the handler's lookup is only an early exit.
//!
//! # Migrations
//!
//! Migrations live in `crates/signup/migrations/` and run at startup once the
//! initial connectivity check succeeds.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use pronto_core::Email;

use crate::models::Account;

pub mod accounts;
pub mod memory;

pub use accounts::PgAccountStore;
pub use memory::MemoryAccountStore;

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistent store boundary for accounts.
///
/// The two data operations mirror what signup needs: a lookup used as a
/// duplicate early-exit and an insert that rejects duplicate emails.
/// `ping` backs the readiness probe and the startup connectivity log line.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by its normalized email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError>;

    /// Persist a new account with its password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    async fn create(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<Account, RepositoryError>;

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store cannot be reached.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// The pool connects lazily: startup must not abort when the database is
/// down, so the first real query surfaces the failure instead.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string cannot be parsed.
pub fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect_lazy(database_url.expose_secret())
}
