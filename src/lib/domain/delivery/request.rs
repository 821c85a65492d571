//! Delivery request

use crate::domain::credentials::Secret;

/// Everything the caller supplies for one delivery, as plain values
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    /// The sender address
    pub sender: String,

    /// The recipient address
    pub recipient: String,

    /// The subject line
    pub subject: String,

    /// The plaintext body, possibly empty
    pub body: String,

    /// The relay account identifier
    pub account: String,

    /// The relay secret for `account`
    pub secret: Secret,
}
