//! Diagnostic report capture

mod collector;
mod errors;
mod report;

pub use collector::DiagnosticCollector;
#[cfg(test)]
pub use collector::MockDiagnosticCollector;
pub use errors::CollectError;
pub use report::DiagnosticReport;
