//! Account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pronto_core::{AccountId, Email};

/// A registered account.
///
/// The bcrypt hash lives only inside the store; it is deliberately absent
/// from this model so no response path can serialize it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Account {
    /// Database identifier.
    pub id: AccountId,
    /// Normalized email address, unique across accounts.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_account_has_no_hash_field() {
        let account = Account {
            id: AccountId::new(1),
            email: Email::parse("user@example.com").unwrap(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&account).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("id"));
        assert!(object.contains_key("email"));
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("password_hash"));
    }
}
