//! Secret store errors

use thiserror::Error;

/// Errors raised by the underlying secret store.
///
/// A missing entry is not an error; see [`super::SecretStore::load`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused access or is unavailable
    #[error("secret store error: {detail}")]
    StoreError {
        /// Description from the platform store, never containing the secret
        detail: String,
    },
}

impl StoreError {
    /// Creates a [`StoreError`] from anything printable
    pub fn new(detail: impl ToString) -> Self {
        StoreError::StoreError {
            detail: detail.to_string(),
        }
    }
}
