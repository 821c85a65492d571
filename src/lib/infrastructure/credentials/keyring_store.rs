//! Secret store backed by the system keyring.
//!
//! Uses the platform's native credential storage:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager

use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::credentials::{Secret, SecretStore, StoreError};

/// Service namespace the entries are stored under
pub const DEFAULT_SERVICE_NAME: &str = "DirectX_Emailer";

/// Stores one keyring entry per account under a fixed service name
#[derive(Debug, Clone)]
pub struct KeyringSecretStore {
    service: String,
}

impl Default for KeyringSecretStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

impl KeyringSecretStore {
    /// Creates a store using `service` as the namespace
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// The service namespace
    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, account: &str) -> Result<Entry, StoreError> {
        Entry::new(&self.service, account).map_err(store_error)
    }
}

impl SecretStore for KeyringSecretStore {
    fn save(&self, account: &str, secret: &Secret) -> Result<(), StoreError> {
        self.entry(account)?
            .set_password(secret.expose())
            .map_err(store_error)?;

        debug!(service = %self.service, account, "stored secret in keyring");

        Ok(())
    }

    fn load(&self, account: &str) -> Result<Option<Secret>, StoreError> {
        match self.entry(account)?.get_password() {
            Ok(password) => Ok(Some(Secret::new(password))),
            Err(keyring::Error::NoEntry) => {
                debug!(service = %self.service, account, "no secret found in keyring");
                Ok(None)
            }
            Err(e) => Err(store_error(e)),
        }
    }

    fn delete(&self, account: &str) -> Result<(), StoreError> {
        match self.entry(account)?.delete_credential() {
            Ok(()) => {
                debug!(service = %self.service, account, "deleted secret from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(store_error(e)),
        }
    }
}

fn store_error(err: keyring::Error) -> StoreError {
    warn!("keyring error: {err}");

    StoreError::new(err)
}
