//! End-to-end delivery of a diagnostic report

mod errors;
mod outcome;
mod pipeline;
mod request;

pub use errors::{DeliveryError, FailureKind};
pub use outcome::DeliveryOutcome;
pub use pipeline::{DeliveryPipeline, DEFAULT_REPORT_PATH};
pub use request::DeliveryRequest;
