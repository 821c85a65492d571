//! Delivery outcome

use super::{DeliveryError, FailureKind};

/// Terminal result of one pipeline run
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// The relay accepted the message
    Delivered,

    /// The first failure that stopped the run
    Failed(DeliveryError),
}

impl DeliveryOutcome {
    /// Whether the message was delivered
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }

    /// The failure classification, if the run failed
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            DeliveryOutcome::Delivered => None,
            DeliveryOutcome::Failed(err) => Some(err.kind()),
        }
    }

    /// Converts the outcome into a [`Result`]
    pub fn into_result(self) -> Result<(), DeliveryError> {
        match self {
            DeliveryOutcome::Delivered => Ok(()),
            DeliveryOutcome::Failed(err) => Err(err),
        }
    }
}

impl From<Result<(), DeliveryError>> for DeliveryOutcome {
    fn from(result: Result<(), DeliveryError>) -> Self {
        match result {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(err) => DeliveryOutcome::Failed(err),
        }
    }
}
