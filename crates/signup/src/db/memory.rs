//! In-memory account store for tests and local development.
//!
//! Enforces the same email uniqueness as the database's unique index:
//! the existence check and the insert happen under one lock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use pronto_core::{AccountId, Email};

use super::{AccountStore, RepositoryError};
use crate::models::Account;

struct StoredAccount {
    account: Account,
    password_hash: String,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    // Keyed by the normalized email.
    accounts: HashMap<String, StoredAccount>,
}

/// Account store that keeps everything in a process-local map.
#[derive(Default)]
pub struct MemoryAccountStore {
    inner: Mutex<Inner>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The stored password hash for an email, if any.
    ///
    /// Test hook mirroring a direct read of the `password_hash` column.
    #[must_use]
    pub fn password_hash(&self, email: &Email) -> Option<String> {
        self.lock()
            .accounts
            .get(email.as_str())
            .map(|stored| stored.password_hash.clone())
    }

    /// Number of stored accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().accounts.len()
    }

    /// Whether the store holds no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .lock()
            .accounts
            .get(email.as_str())
            .map(|stored| stored.account.clone()))
    }

    async fn create(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<Account, RepositoryError> {
        let mut inner = self.lock();

        if inner.accounts.contains_key(email.as_str()) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        inner.next_id += 1;
        let account = Account {
            id: AccountId::new(inner.next_id),
            email: email.clone(),
            created_at: Utc::now(),
        };

        inner.accounts.insert(
            email.as_str().to_owned(),
            StoredAccount {
                account: account.clone(),
                password_hash: password_hash.to_owned(),
            },
        );

        Ok(account)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
