//! Secret store adapters

pub mod keyring_store;
pub mod memory;
