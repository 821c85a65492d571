//! Adapters for the operating system, the mail relay and the secret store

pub mod credentials;
pub mod diagnostics;
pub mod email;
pub mod logging;
