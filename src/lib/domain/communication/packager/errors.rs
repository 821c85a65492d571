//! Error types for report packaging

use std::path::PathBuf;

use lettre::error::Error;
use thiserror::Error;

/// Errors that can occur when packaging a report into a message
#[derive(Debug, Error)]
pub enum PackageError {
    /// The report file could not be opened or read
    #[error("attachment not found: {}", path.display())]
    AttachmentMissing {
        /// The report path that was expected to exist
        path: PathBuf,
    },

    /// A sender or recipient address is not a valid mailbox
    #[error("invalid email address: {address}")]
    InvalidAddress {
        /// The rejected address
        address: String,
    },

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl From<Error> for PackageError {
    fn from(err: Error) -> Self {
        PackageError::UnknownError(err.into())
    }
}
