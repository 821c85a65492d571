//! Email message

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lettre::message::{
    header::{ContentTransferEncoding, ContentType},
    Attachment as MimeAttachment, Body, Mailbox, MultiPart, SinglePart,
};

use crate::domain::communication::{email_addresses::EmailAddress, packager::PackageError};

/// MIME type used for the report attachment
pub const ATTACHMENT_MIME_TYPE: &str = "application/octet-stream";

/// A binary attachment
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    content: Vec<u8>,
}

impl Attachment {
    /// Creates a new attachment
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    /// The file name announced in `Content-Disposition`
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The raw attachment bytes
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The MIME type of the attachment
    pub fn mime_type(&self) -> &'static str {
        ATTACHMENT_MIME_TYPE
    }

    /// The content in standard base64, unwrapped
    pub fn encoded(&self) -> String {
        STANDARD.encode(&self.content)
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("len", &self.content.len())
            .finish()
    }
}

/// A fully formed email carrying one plaintext body and one attachment.
///
/// Immutable once built. The wire representation is assembled up front so
/// that a `Message` that exists is always deliverable.
#[derive(Debug, Clone)]
pub struct Message {
    sender: EmailAddress,
    recipient: EmailAddress,
    subject: String,
    body: String,
    attachment: Attachment,
    email: lettre::Message,
}

impl Message {
    /// Assembles a `multipart/mixed` message
    ///
    /// # Returns
    /// - [`Ok`] with the [`Message`] if the wire form could be built.
    /// - [`Err`] with a [`PackageError`] otherwise.
    pub fn new(
        sender: EmailAddress,
        recipient: EmailAddress,
        subject: &str,
        body: &str,
        attachment: Attachment,
    ) -> Result<Self, PackageError> {
        let from = mailbox(&sender)?;
        let to = mailbox(&recipient)?;

        let content_type = ContentType::parse(ATTACHMENT_MIME_TYPE)
            .map_err(|e| PackageError::UnknownError(anyhow::anyhow!("{e}")))?;

        let encoded = Body::new_with_encoding(
            attachment.content().to_vec(),
            ContentTransferEncoding::Base64,
        )
        .map_err(|_| {
            PackageError::UnknownError(anyhow::anyhow!("attachment cannot be base64 encoded"))
        })?;

        let email = lettre::Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(
                        MimeAttachment::new(attachment.filename().to_string())
                            .body(encoded, content_type),
                    ),
            )?;

        Ok(Self {
            sender,
            recipient,
            subject: subject.to_string(),
            body: body.to_string(),
            attachment,
            email,
        })
    }

    /// The sender of the email
    pub fn sender(&self) -> &EmailAddress {
        &self.sender
    }

    /// The recipient of the email
    pub fn recipient(&self) -> &EmailAddress {
        &self.recipient
    }

    /// The subject of the email
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The plain text body of the email
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The report attachment
    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    /// The assembled wire message
    pub fn email(&self) -> &lettre::Message {
        &self.email
    }

    /// The RFC 5322 bytes handed to the relay
    pub fn formatted(&self) -> Vec<u8> {
        self.email.formatted()
    }
}

fn mailbox(address: &EmailAddress) -> Result<Mailbox, PackageError> {
    address
        .as_str()
        .parse()
        .map_err(|_| PackageError::InvalidAddress {
            address: address.to_string(),
        })
}
