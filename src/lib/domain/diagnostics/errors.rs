//! Errors raised while running the diagnostic tool

use thiserror::Error;

/// Errors that can occur when collecting a diagnostic report
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectError {
    /// The diagnostic tool could not be located or executed
    #[error("diagnostic tool not found: {program}")]
    ToolNotFound {
        /// The program that was invoked
        program: String,
    },

    /// The diagnostic tool ran but reported failure.
    ///
    /// `exit_code` is `None` when the process was terminated by a signal.
    #[error("diagnostic tool failed with exit code {exit_code:?}")]
    ToolExecutionFailed {
        /// The exit status of the tool
        exit_code: Option<i32>,
    },
}
