//! Secret store contract

#[cfg(test)]
use mockall::mock;

use super::{Secret, StoreError};

/// Persists one secret per account identifier under a fixed service namespace.
///
/// No transactional guarantee is made across calls; the last writer wins.
pub trait SecretStore: Send + Sync + 'static {
    /// Stores `secret` for `account`, replacing any previous secret
    fn save(&self, account: &str, secret: &Secret) -> Result<(), StoreError>;

    /// Retrieves the secret for `account`
    ///
    /// # Returns
    /// - [`Ok`] with [`Some`] secret if an entry exists.
    /// - [`Ok`] with [`None`] if there is no entry for `account`.
    /// - [`Err`] with a [`StoreError`] if the store itself could not be accessed.
    fn load(&self, account: &str) -> Result<Option<Secret>, StoreError>;

    /// Removes the secret for `account`. Removing a missing entry succeeds.
    fn delete(&self, account: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mock! {
    pub SecretStore {}

    impl SecretStore for SecretStore {
        fn save(&self, account: &str, secret: &Secret) -> Result<(), StoreError>;
        fn load(&self, account: &str) -> Result<Option<Secret>, StoreError>;
        fn delete(&self, account: &str) -> Result<(), StoreError>;
    }
}
