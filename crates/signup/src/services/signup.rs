//! Signup service.
//!
//! Orchestrates the uniqueness-check -> hash -> persist sequence for one
//! registration. Validation happens before this service is invoked, so it
//! only ever sees a normalized email and an accepted password.

use std::sync::Arc;

use pronto_core::Email;

use crate::db::{AccountStore, RepositoryError};
use crate::models::Account;

/// Errors that can occur during signup.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    /// An account with this email is already registered.
    #[error("account already exists for this email")]
    AccountExists,

    /// Password hashing failed.
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// The hashing task was cancelled before completing.
    #[error("password hashing task was cancelled")]
    HashTaskCancelled,

    /// Storage layer error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Service that registers new accounts.
pub struct SignupService {
    accounts: Arc<dyn AccountStore>,
    bcrypt_cost: u32,
}

impl SignupService {
    /// Create a new signup service.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>, bcrypt_cost: u32) -> Self {
        Self {
            accounts,
            bcrypt_cost,
        }
    }

    /// Register a new account.
    ///
    /// The duplicate pre-check runs before hashing so rejected requests never
    /// pay the bcrypt cost. The unique index on `account.email` stays the
    /// authoritative signal: when two signups race past the pre-check, the
    /// losing insert surfaces as `AccountExists` as well.
    ///
    /// bcrypt runs on the blocking pool so a batch of signups cannot stall
    /// the async runtime.
    ///
    /// # Errors
    ///
    /// Returns `SignupError::AccountExists` if the email is already
    /// registered, `SignupError::Hash` if hashing fails, and
    /// `SignupError::Repository` for storage failures.
    pub async fn register(&self, email: Email, password: String) -> Result<Account, SignupError> {
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(SignupError::AccountExists);
        }

        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|_| SignupError::HashTaskCancelled)??;

        match self.accounts.create(&email, &password_hash).await {
            Ok(account) => Ok(account),
            Err(RepositoryError::Conflict(_)) => Err(SignupError::AccountExists),
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryAccountStore;

    // Minimum bcrypt cost keeps the tests fast.
    const TEST_COST: u32 = 4;

    fn service() -> (SignupService, Arc<MemoryAccountStore>) {
        let store = Arc::new(MemoryAccountStore::new());
        (SignupService::new(store.clone(), TEST_COST), store)
    }

    #[tokio::test]
    async fn test_register_stores_normalized_email_and_bcrypt_hash() {
        let (service, store) = service();
        let email = Email::parse("User@Example.com").unwrap();

        let account = service
            .register(email.clone(), "validpass".to_owned())
            .await
            .unwrap();

        assert_eq!(account.email.as_str(), "user@example.com");

        let hash = store.password_hash(&account.email).unwrap();
        assert_ne!(hash, "validpass");
        assert!(bcrypt::verify("validpass", &hash).unwrap());
        assert!(!bcrypt::verify("wrongpass", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_rejected_and_no_second_record() {
        let (service, store) = service();
        let email = Email::parse("a@b.com").unwrap();

        service
            .register(email.clone(), "validpass".to_owned())
            .await
            .unwrap();

        let err = service
            .register(email.clone(), "otherpass".to_owned())
            .await
            .unwrap_err();

        assert!(matches!(err, SignupError::AccountExists));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_same_email_yields_one_success() {
        let (service, store) = service();
        let email = Email::parse("race@example.com").unwrap();

        // Both flows can pass the pre-check; the store's uniqueness
        // enforcement must still reject one of them.
        let (first, second) = tokio::join!(
            service.register(email.clone(), "validpass".to_owned()),
            service.register(email.clone(), "validpass".to_owned()),
        );

        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let rejected = [first, second]
            .into_iter()
            .filter_map(Result::err)
            .collect::<Vec<_>>();
        assert_eq!(rejected.len(), 1);
        assert!(matches!(rejected[0], SignupError::AccountExists));
        assert_eq!(store.len(), 1);
    }
}
