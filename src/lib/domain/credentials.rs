//! Relay credentials and their persistence

mod errors;
mod secret;
mod store;

pub use errors::StoreError;
pub use secret::Secret;
#[cfg(test)]
pub use store::MockSecretStore;
pub use store::SecretStore;

use tracing::debug;

/// Picks the secret supplied by the caller, falling back to the store.
///
/// # Returns
/// - [`Ok`] with [`Some`] secret when one was supplied or found.
/// - [`Ok`] with [`None`] when neither is available.
/// - [`Err`] with a [`StoreError`] if the store had to be consulted and failed.
pub fn resolve_secret<S: SecretStore + ?Sized>(
    store: &S,
    account: &str,
    supplied: Option<Secret>,
) -> Result<Option<Secret>, StoreError> {
    match supplied {
        Some(secret) if !secret.is_empty() => Ok(Some(secret)),
        _ => {
            debug!(account, "no secret supplied, consulting the secret store");
            store.load(account)
        }
    }
}
