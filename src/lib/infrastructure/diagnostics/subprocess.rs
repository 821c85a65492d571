//! Diagnostic collector backed by an external command

use std::{
    ffi::{OsStr, OsString},
    path::Path,
    process::{Command, Stdio},
};

use clap::Parser;
use tracing::{debug, info, warn};

use crate::domain::diagnostics::{CollectError, DiagnosticCollector, DiagnosticReport};

/// Placeholder in the argument template replaced by the report path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Diagnostic tool configuration
#[derive(Clone, Debug, Parser)]
pub struct DiagnosticToolConfig {
    /// The diagnostic program to run
    #[clap(long = "diag-tool", env = "DIAG_TOOL", default_value = "dxdiag")]
    pub program: String,

    /// Arguments for the program, `{output}` is replaced by the report path
    #[clap(
        long = "diag-tool-arg",
        env = "DIAG_TOOL_ARGS",
        value_delimiter = ' ',
        allow_hyphen_values = true,
        default_values = ["/t", OUTPUT_PLACEHOLDER]
    )]
    pub args: Vec<String>,
}

impl Default for DiagnosticToolConfig {
    fn default() -> Self {
        Self {
            program: "dxdiag".to_string(),
            args: vec!["/t".to_string(), OUTPUT_PLACEHOLDER.to_string()],
        }
    }
}

/// Runs the configured tool as a blocking subprocess
#[derive(Debug, Clone, Default)]
pub struct CommandCollector {
    config: DiagnosticToolConfig,
}

impl CommandCollector {
    /// Create a new collector
    pub fn new(config: DiagnosticToolConfig) -> Self {
        Self { config }
    }

    fn args(&self, output: &Path) -> Vec<OsString> {
        self.config
            .args
            .iter()
            .map(|arg| substitute_output(arg, output.as_os_str()))
            .collect()
    }
}

/// Replaces every placeholder in `arg` without forcing `output` through UTF-8
fn substitute_output(arg: &str, output: &OsStr) -> OsString {
    let mut parts = arg.split(OUTPUT_PLACEHOLDER);
    let mut substituted = OsString::from(parts.next().unwrap_or_default());

    for part in parts {
        substituted.push(output);
        substituted.push(part);
    }

    substituted
}

impl DiagnosticCollector for CommandCollector {
    fn collect(&self, output: &Path) -> Result<DiagnosticReport, CollectError> {
        let args = self.args(output);
        debug!(program = %self.config.program, ?args, "running diagnostic tool");

        let result = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                warn!(program = %self.config.program, "diagnostic tool could not be started: {e}");

                CollectError::ToolNotFound {
                    program: self.config.program.clone(),
                }
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            warn!(
                program = %self.config.program,
                status = %result.status,
                stderr = %stderr.trim(),
                "diagnostic tool failed"
            );

            return Err(CollectError::ToolExecutionFailed {
                exit_code: result.status.code(),
            });
        }

        info!(path = %output.display(), "diagnostic information saved");

        Ok(DiagnosticReport::new(output))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, os::unix::ffi::OsStrExt};

    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn shell(script: &str) -> CommandCollector {
        CommandCollector::new(DiagnosticToolConfig {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                script.to_string(),
                "sh".to_string(),
                OUTPUT_PLACEHOLDER.to_string(),
            ],
        })
    }

    #[test]
    fn test_default_config_runs_dxdiag_text_report() {
        let collector = CommandCollector::default();

        assert_eq!(collector.config.program, "dxdiag");
        assert_eq!(
            collector.args(Path::new("dxdiag_report.txt")),
            vec![OsString::from("/t"), OsString::from("dxdiag_report.txt")]
        );
    }

    #[test]
    fn test_placeholder_inside_argument_is_substituted() {
        assert_eq!(
            substitute_output("--out={output}.txt", OsStr::new("/tmp/report")),
            OsString::from("--out=/tmp/report.txt")
        );
        assert_eq!(substitute_output("/t", OsStr::new("/tmp/report")), OsString::from("/t"));
    }

    #[test]
    fn test_collect_keeps_non_utf8_output_path() -> TestResult {
        let dir = TempDir::new()?;
        let output = dir.path().join(OsStr::from_bytes(b"report-\xff.txt"));
        let collector = shell(r#"printf 'System Information' > "$1""#);

        assert_eq!(collector.args(&output)[3], output.as_os_str().to_os_string());

        collector.collect(&output)?;

        assert_eq!(fs::read_to_string(&output)?, "System Information");

        Ok(())
    }

    #[test]
    fn test_collect_writes_report_to_output() -> TestResult {
        let dir = TempDir::new()?;
        let output = dir.path().join("report.txt");

        let report = shell(r#"printf 'System Information' > "$1""#).collect(&output)?;

        assert_eq!(report.path(), output.as_path());
        assert_eq!(fs::read_to_string(&output)?, "System Information");

        Ok(())
    }

    #[test]
    fn test_collect_overwrites_existing_report() -> TestResult {
        let dir = TempDir::new()?;
        let output = dir.path().join("report.txt");
        fs::write(&output, "stale report from a previous run")?;

        shell(r#"printf 'fresh' > "$1""#).collect(&output)?;

        assert_eq!(fs::read_to_string(&output)?, "fresh");

        Ok(())
    }

    #[test]
    fn test_collect_does_not_check_report_contents() -> TestResult {
        let dir = TempDir::new()?;
        let output = dir.path().join("never-written.txt");

        let report = shell("exit 0").collect(&output)?;

        assert_eq!(report.path(), output.as_path());
        assert!(!output.exists());

        Ok(())
    }

    #[test]
    fn test_collect_missing_tool() -> TestResult {
        let dir = TempDir::new()?;
        let collector = CommandCollector::new(DiagnosticToolConfig {
            program: "definitely-not-an-installed-diagnostic-tool".to_string(),
            args: vec![OUTPUT_PLACEHOLDER.to_string()],
        });

        let result = collector.collect(&dir.path().join("report.txt"));

        assert_eq!(
            result,
            Err(CollectError::ToolNotFound {
                program: "definitely-not-an-installed-diagnostic-tool".to_string()
            })
        );

        Ok(())
    }

    #[test]
    fn test_collect_non_zero_exit() -> TestResult {
        let dir = TempDir::new()?;

        let result = shell("echo 'no display adapter' >&2; exit 3").collect(&dir.path().join("r.txt"));

        assert_eq!(
            result,
            Err(CollectError::ToolExecutionFailed { exit_code: Some(3) })
        );

        Ok(())
    }

    #[test]
    fn test_collect_killed_by_signal_has_no_exit_code() -> TestResult {
        let dir = TempDir::new()?;

        let result = shell("kill -9 $$").collect(&dir.path().join("r.txt"));

        assert_eq!(
            result,
            Err(CollectError::ToolExecutionFailed { exit_code: None })
        );

        Ok(())
    }
}
