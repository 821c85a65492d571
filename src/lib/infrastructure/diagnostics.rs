//! Diagnostic tool adapters

pub mod subprocess;
