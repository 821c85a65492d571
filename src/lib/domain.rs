//! Domain types, contracts and services

pub mod communication;
pub mod credentials;
pub mod delivery;
pub mod diagnostics;
