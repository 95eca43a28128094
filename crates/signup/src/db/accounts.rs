//! `PostgreSQL`-backed account store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pronto_core::{AccountId, Email};

use super::{AccountStore, RepositoryError};
use crate::models::Account;

/// Account store backed by the `account` table.
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Raw row shape shared by the lookup and insert queries.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Account {
            id: AccountId::new(self.id),
            email,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, email, created_at
            FROM account
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn create(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO account (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, created_at
            ",
        )
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_account()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
