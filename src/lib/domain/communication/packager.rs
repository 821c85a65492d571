//! Report packaging

mod errors;

#[cfg(test)]
use mockall::mock;
use tracing::{debug, warn};

pub use errors::PackageError;

use crate::domain::{
    communication::{
        email_addresses::EmailAddress,
        mailer::{Attachment, Message},
    },
    diagnostics::DiagnosticReport,
};

/// Turns a diagnostic report into a deliverable [`Message`]
pub trait ReportPackager: Send + Sync + 'static {
    /// Builds a message with the report attached.
    ///
    /// # Arguments
    /// * `sender` - The sender address.
    /// * `recipient` - The recipient address.
    /// * `subject` - The subject line.
    /// * `body` - The plaintext body, which may be empty.
    /// * `report` - The [`DiagnosticReport`] to attach.
    ///
    /// # Returns
    /// - [`Ok`] with the [`Message`].
    /// - [`Err`] with [`PackageError::AttachmentMissing`] if the report file cannot be read,
    ///   in which case no message is produced.
    fn build(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
        report: &DiagnosticReport,
    ) -> Result<Message, PackageError>;
}

#[cfg(test)]
mock! {
    pub ReportPackager {}

    impl ReportPackager for ReportPackager {
        fn build(
            &self,
            sender: &str,
            recipient: &str,
            subject: &str,
            body: &str,
            report: &DiagnosticReport,
        ) -> Result<Message, PackageError>;
    }
}

/// Packages the report file as a base64 `application/octet-stream` attachment
#[derive(Debug, Clone, Default)]
pub struct ReportPackagerImpl;

impl ReportPackagerImpl {
    /// Creates a new report packager
    pub fn new() -> Self {
        Self
    }
}

impl ReportPackager for ReportPackagerImpl {
    fn build(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
        report: &DiagnosticReport,
    ) -> Result<Message, PackageError> {
        let content = report.read().map_err(|e| {
            warn!(path = %report.path().display(), "attachment file not readable: {e}");

            PackageError::AttachmentMissing {
                path: report.path().to_path_buf(),
            }
        })?;

        let attachment = Attachment::new(report.file_name(), content);

        let message = Message::new(
            address(sender)?,
            address(recipient)?,
            subject,
            body,
            attachment,
        )?;

        debug!(
            filename = message.attachment().filename(),
            bytes = message.attachment().content().len(),
            "packaged diagnostic report"
        );

        Ok(message)
    }
}

fn address(raw: &str) -> Result<EmailAddress, PackageError> {
    EmailAddress::new(raw).map_err(|_| PackageError::InvalidAddress {
        address: raw.to_string(),
    })
}
