//! Diagnostic collector contract

use std::path::Path;

#[cfg(test)]
use mockall::mock;

use super::{CollectError, DiagnosticReport};

/// Produces a diagnostic report file by running an external tool
pub trait DiagnosticCollector: Send + Sync + 'static {
    /// Runs the tool and blocks until it exits.
    ///
    /// The tool writes its report to `output`, replacing any existing file.
    /// Only the exit status is checked, not the file contents.
    ///
    /// # Arguments
    /// * `output` - Where the tool should write its report.
    ///
    /// # Returns
    /// - [`Ok`] with a [`DiagnosticReport`] referencing `output`.
    /// - [`Err`] with a [`CollectError`] if the tool is missing or exits non-zero.
    fn collect(&self, output: &Path) -> Result<DiagnosticReport, CollectError>;
}

#[cfg(test)]
mock! {
    pub DiagnosticCollector {}

    impl DiagnosticCollector for DiagnosticCollector {
        fn collect(&self, output: &Path) -> Result<DiagnosticReport, CollectError>;
    }
}
