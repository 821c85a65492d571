//! Email addresses, report packaging and mail transport

pub mod email_addresses;
pub mod mailer;
pub mod packager;
