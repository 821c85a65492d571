//! Mail transport errors

use thiserror::Error;

/// Errors that can occur while delivering a message to the relay
#[derive(Debug, Error)]
pub enum SendError {
    /// The relay rejected the account identifier and secret
    #[error("the relay rejected the credentials")]
    AuthenticationFailed,

    /// Any other network or protocol failure
    #[error("transport error: {detail}")]
    TransportError {
        /// What went wrong
        detail: String,
    },
}

impl SendError {
    /// Creates a [`SendError::TransportError`] from anything printable
    pub fn transport(detail: impl ToString) -> Self {
        SendError::TransportError {
            detail: detail.to_string(),
        }
    }
}
