//! Delivery pipeline

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{error, info};

use crate::domain::{
    communication::{mailer::MailTransport, packager::ReportPackager},
    diagnostics::DiagnosticCollector,
};

use super::{DeliveryError, DeliveryOutcome, DeliveryRequest};

/// Where the diagnostic report is written when the caller does not choose
pub const DEFAULT_REPORT_PATH: &str = "dxdiag_report.txt";

/// Collects a diagnostic report, packages it and mails it.
///
/// Stages run strictly in order and the first failure ends the run. Nothing
/// is rolled back, so the report file may remain on disk after a failure.
///
/// Runs that share an output path must not overlap; callers serialize them
/// or give each run its own path.
#[derive(Debug)]
pub struct DeliveryPipeline<C, P, T>
where
    C: DiagnosticCollector,
    P: ReportPackager,
    T: MailTransport,
{
    collector: Arc<C>,
    packager: Arc<P>,
    transport: Arc<T>,
    output: PathBuf,
}

impl<C, P, T> Clone for DeliveryPipeline<C, P, T>
where
    C: DiagnosticCollector,
    P: ReportPackager,
    T: MailTransport,
{
    fn clone(&self) -> Self {
        Self {
            collector: Arc::clone(&self.collector),
            packager: Arc::clone(&self.packager),
            transport: Arc::clone(&self.transport),
            output: self.output.clone(),
        }
    }
}

impl<C, P, T> DeliveryPipeline<C, P, T>
where
    C: DiagnosticCollector,
    P: ReportPackager,
    T: MailTransport,
{
    /// Creates a pipeline writing its report to [`DEFAULT_REPORT_PATH`]
    pub fn new(collector: Arc<C>, packager: Arc<P>, transport: Arc<T>) -> Self {
        Self {
            collector,
            packager,
            transport,
            output: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }

    /// Uses `output` as the report location
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// The report location
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Runs collect, package and send for one request.
    ///
    /// Blocks for the whole run, so async callers should move it onto a
    /// blocking worker.
    ///
    /// # Returns
    /// [`DeliveryOutcome::Delivered`] if the relay accepted the message, otherwise
    /// [`DeliveryOutcome::Failed`] with the first stage failure unchanged.
    pub fn run(&self, request: &DeliveryRequest) -> DeliveryOutcome {
        let outcome = DeliveryOutcome::from(self.deliver(request));

        match &outcome {
            DeliveryOutcome::Delivered => {
                info!(recipient = %request.recipient, "diagnostic report delivered")
            }
            DeliveryOutcome::Failed(err) => {
                error!(kind = ?err.kind(), "diagnostic report delivery failed: {err}")
            }
        }

        outcome
    }

    fn deliver(&self, request: &DeliveryRequest) -> Result<(), DeliveryError> {
        let report = self.collector.collect(&self.output)?;
        info!(path = %report.path().display(), "diagnostic report collected");

        let message = self.packager.build(
            &request.sender,
            &request.recipient,
            &request.subject,
            &request.body,
            &report,
        )?;
        info!(
            attachment = message.attachment().filename(),
            "diagnostic report packaged"
        );

        self.transport
            .send(&message, &request.account, &request.secret)?;

        Ok(())
    }
}
