//! Mail relay adapters

pub mod smtp;
