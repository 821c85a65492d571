//! Diagnostic report

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Attachment name used when the report path has no file name component
const FALLBACK_FILE_NAME: &str = "diagnostic_report.txt";

/// A report file written by the diagnostic tool.
///
/// The contents are opaque and only read when packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    path: PathBuf,
}

impl DiagnosticReport {
    /// Creates a report referencing `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the report file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the report file
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
    }

    /// Reads the whole report as bytes
    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_file_name_is_base_name() {
        let report = DiagnosticReport::new("/tmp/reports/dxdiag_report.txt");

        assert_eq!(report.file_name(), "dxdiag_report.txt");
    }

    #[test]
    fn test_file_name_falls_back_without_base_name() {
        let report = DiagnosticReport::new("/");

        assert_eq!(report.file_name(), FALLBACK_FILE_NAME);
    }

    #[test]
    fn test_read_returns_raw_bytes() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("report.bin");
        fs::write(&path, [0u8, 159, 146, 150])?;

        let report = DiagnosticReport::new(&path);

        assert_eq!(report.read()?, vec![0u8, 159, 146, 150]);

        Ok(())
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let report = DiagnosticReport::new("/definitely/not/here.txt");

        assert!(report.read().is_err());
    }
}
