//! Typed failures raised by the restore/destroy pipelines
//!
//! Pipelines return `anyhow::Result`; these variants sit at the root of the
//! error chain so callers (and tests) can `downcast_ref` them.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RdsingError {
    /// The source instance has no snapshots to restore from
    #[error("No snapshots found for DB instance '{instance_id}'")]
    SnapshotNotFound { instance_id: String },

    /// A wait exhausted its attempt or time budget
    #[error("Timeout waiting for {resource} after {elapsed:?} ({attempts} attempts)")]
    WaitTimeout {
        resource: String,
        elapsed: Duration,
        attempts: u32,
    },

    /// The operator interrupted the run before `resource` finished
    #[error("Cancelled: {resource}")]
    Cancelled { resource: String },

    /// The instance reached a status it cannot leave on its own
    #[error("DB instance {instance_id} entered unexpected status: {status}")]
    UnexpectedStatus { instance_id: String, status: String },

    /// A name given by the operator cannot be sent to RDS
    #[error("Invalid {kind} '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    /// The instance disappeared while we were waiting for it to become available
    #[error("DB instance {instance_id} not found")]
    InstanceNotFound { instance_id: String },
}

impl RdsingError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RdsingError::WaitTimeout { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RdsingError::SnapshotNotFound { .. } | RdsingError::InstanceNotFound { .. }
        )
    }
}

/// Find an [`RdsingError`] anywhere in an error chain.
pub fn find_rdsing_error(error: &anyhow::Error) -> Option<&RdsingError> {
    error.chain().find_map(|cause| cause.downcast_ref::<RdsingError>())
}
