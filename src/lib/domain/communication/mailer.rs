//! Mail transport module

mod errors;
mod message;

#[cfg(test)]
use mockall::mock;

pub use errors::SendError;
pub use message::{Attachment, Message, ATTACHMENT_MIME_TYPE};

use crate::domain::credentials::Secret;

/// Delivers packaged messages to the mail relay
pub trait MailTransport: Send + Sync + 'static {
    /// Sends a message over an encrypted, authenticated session.
    ///
    /// Exactly one delivery attempt is made. The connection is released
    /// before returning, whatever the result.
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to deliver.
    /// * `account` - The account identifier to authenticate as.
    /// * `secret` - The [`Secret`] for `account`.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] once the relay accepted the message,
    /// or an [`Err`] containing a [`SendError`].
    fn send(&self, message: &Message, account: &str, secret: &Secret) -> Result<(), SendError>;
}

#[cfg(test)]
mock! {
    pub MailTransport {}

    impl MailTransport for MailTransport {
        fn send(&self, message: &Message, account: &str, secret: &Secret) -> Result<(), SendError>;
    }
}
