//! Process-local secret store

use std::{collections::HashMap, sync::RwLock};

use tracing::debug;

use crate::domain::credentials::{Secret, SecretStore, StoreError};

/// Keeps secrets in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: RwLock<HashMap<String, Secret>>,
}

impl MemorySecretStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn save(&self, account: &str, secret: &Secret) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::new("in-memory store poisoned"))?
            .insert(account.to_string(), secret.clone());

        debug!(account, "stored secret in memory");

        Ok(())
    }

    fn load(&self, account: &str) -> Result<Option<Secret>, StoreError> {
        Ok(self
            .entries
            .read()
            .map_err(|_| StoreError::new("in-memory store poisoned"))?
            .get(account)
            .cloned())
    }

    fn delete(&self, account: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::new("in-memory store poisoned"))?
            .remove(account);

        Ok(())
    }
}
