use std::time::Duration;

use thiserror::Error;

use crate::harness::steps::Step;

/// Errors raised while driving the rollup service.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced an HTTP response (connection refused, DNS, timeout).
    #[error("Transport error on {step}: {source}")]
    Transport {
        step: Step,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with anything other than 200.
    #[error("{step} failed with HTTP status {status}")]
    StepFailed { step: Step, status: u16 },

    /// Poll settlement did not observe a 200 within the allowed wait.
    #[error("Settlement after {step} not confirmed within {}ms", .waited.as_millis())]
    SettleTimeout { step: Step, waited: Duration },

    /// Console output could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// The fixed console message printed when this error ends the run, if any.
    ///
    /// Only status failures carry one; transport faults propagate without the
    /// scripted message.
    pub fn console_message(&self) -> Option<&'static str> {
        match self {
            HarnessError::StepFailed { step, .. } => Some(step.failure_message()),
            _ => None,
        }
    }

    /// Whether the run ended because the service rejected a step.
    pub fn is_step_failure(&self) -> bool {
        matches!(self, HarnessError::StepFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
