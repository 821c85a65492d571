#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Captures a machine's diagnostic report and mails it as an attachment
//! through an authenticated SMTP relay, with relay credentials kept in the
//! operating system's secret store.

pub mod domain;
pub mod infrastructure;
