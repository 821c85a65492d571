//! Delivery failure classification

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::domain::{
    communication::{mailer::SendError, packager::PackageError},
    diagnostics::CollectError,
};

/// Stable classification of a delivery failure, for callers that render
/// their own messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The diagnostic tool could not be executed
    ToolNotFound,
    /// The diagnostic tool exited unsuccessfully
    ToolExecutionFailed,
    /// The report file was not readable when packaging
    AttachmentMissing,
    /// A sender or recipient address was rejected
    InvalidAddress,
    /// The relay rejected the credentials
    AuthenticationFailed,
    /// Network or protocol failure talking to the relay
    TransportError,
    /// Anything else
    Unknown,
}

/// The first failure encountered by the delivery pipeline
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The diagnostic tool could not be executed
    #[error("diagnostic tool not found: {program}")]
    ToolNotFound {
        /// The program that was invoked
        program: String,
    },

    /// The diagnostic tool exited unsuccessfully
    #[error("diagnostic tool failed with exit code {exit_code:?}")]
    ToolExecutionFailed {
        /// The exit status, if the tool exited normally
        exit_code: Option<i32>,
    },

    /// The report file was not readable when packaging
    #[error("attachment not found: {}", path.display())]
    AttachmentMissing {
        /// The report path
        path: PathBuf,
    },

    /// A sender or recipient address was rejected
    #[error("invalid email address: {address}")]
    InvalidAddress {
        /// The rejected address
        address: String,
    },

    /// The relay rejected the credentials
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network or protocol failure talking to the relay
    #[error("transport error: {detail}")]
    TransportError {
        /// What went wrong
        detail: String,
    },

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

impl DeliveryError {
    /// The classification of this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            DeliveryError::ToolNotFound { .. } => FailureKind::ToolNotFound,
            DeliveryError::ToolExecutionFailed { .. } => FailureKind::ToolExecutionFailed,
            DeliveryError::AttachmentMissing { .. } => FailureKind::AttachmentMissing,
            DeliveryError::InvalidAddress { .. } => FailureKind::InvalidAddress,
            DeliveryError::AuthenticationFailed => FailureKind::AuthenticationFailed,
            DeliveryError::TransportError { .. } => FailureKind::TransportError,
            DeliveryError::UnknownError(_) => FailureKind::Unknown,
        }
    }
}

impl From<CollectError> for DeliveryError {
    fn from(err: CollectError) -> Self {
        debug!("CollectError -> DeliveryError");

        match err {
            CollectError::ToolNotFound { program } => DeliveryError::ToolNotFound { program },
            CollectError::ToolExecutionFailed { exit_code } => {
                DeliveryError::ToolExecutionFailed { exit_code }
            }
        }
    }
}

impl From<PackageError> for DeliveryError {
    fn from(err: PackageError) -> Self {
        debug!("PackageError -> DeliveryError");

        match err {
            PackageError::AttachmentMissing { path } => DeliveryError::AttachmentMissing { path },
            PackageError::InvalidAddress { address } => DeliveryError::InvalidAddress { address },
            PackageError::UnknownError(e) => DeliveryError::UnknownError(e),
        }
    }
}

impl From<SendError> for DeliveryError {
    fn from(err: SendError) -> Self {
        debug!("SendError -> DeliveryError");

        match err {
            SendError::AuthenticationFailed => DeliveryError::AuthenticationFailed,
            SendError::TransportError { detail } => DeliveryError::TransportError { detail },
        }
    }
}
