//! Delete a DB instance, optionally keeping a final snapshot

use super::wait_for_deleted;
use crate::aws::{DeleteRequest, InstanceRecord, RdsOperations};
use crate::config::DestroyOptions;
use crate::defaults::MAX_SNAPSHOT_ID_LEN;
use crate::error::RdsingError;
use crate::wait::ensure_not_cancelled;
use anyhow::{Context, Result};
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyPhase {
    Deleting,
    WaitingDeleted,
    Done,
}

impl fmt::Display for DestroyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DestroyPhase::Deleting => "deleting",
            DestroyPhase::WaitingDeleted => "waiting-deleted",
            DestroyPhase::Done => "done",
        })
    }
}

/// What a successful destroy did
#[derive(Debug, Clone)]
pub struct DestroyOutcome {
    /// Instance as reported by the delete acknowledgement
    pub instance: InstanceRecord,
    pub final_snapshot_id: Option<String>,
    /// Whether we polled until the instance was gone
    pub waited: bool,
}

/// Reject a final snapshot name that would make RDS refuse the delete, or
/// that an empty shell variable produced.
pub fn validate_final_snapshot_name(name: &str) -> Result<(), RdsingError> {
    let invalid = |reason: &str| RdsingError::InvalidName {
        kind: "final snapshot name",
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("must not be blank"));
    }
    if name.len() > MAX_SNAPSHOT_ID_LEN {
        return Err(invalid("must be at most 255 characters"));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(invalid("must start with a letter"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid("may only contain letters, digits and hyphens"));
    }
    if name.ends_with('-') || name.contains("--") {
        return Err(invalid("must not end with a hyphen or contain two in a row"));
    }
    Ok(())
}

/// Delete `options.instance_id`.
///
/// The delete acknowledgement is final unless `wait_for_deletion` is set.
pub async fn destroy<R: RdsOperations>(
    rds: &R,
    options: &DestroyOptions,
    cancel: Option<&CancellationToken>,
) -> Result<DestroyOutcome> {
    if let Some(name) = &options.final_snapshot {
        validate_final_snapshot_name(name)?;
    }
    let request = DeleteRequest::new(&options.instance_id, options.final_snapshot.clone());
    let final_snapshot_id = request.final_snapshot_id.clone();

    ensure_not_cancelled(cancel, &format!("deletion of {}", options.instance_id))?;
    info!(instance_id = %options.instance_id, phase = %DestroyPhase::Deleting, "Destroy phase");
    let instance = rds
        .delete_instance(request)
        .await
        .with_context(|| format!("Failed to delete DB instance {}", options.instance_id))?;
    info!(instance_id = %instance.instance_id, status = %instance.status, "Delete acknowledged");

    if options.wait_for_deletion {
        info!(instance_id = %options.instance_id, phase = %DestroyPhase::WaitingDeleted, "Destroy phase");
        wait_for_deleted(rds, &options.instance_id, &options.wait, cancel)
            .await
            .with_context(|| {
                format!("DB instance {} was not deleted in time", options.instance_id)
            })?;
    }

    info!(instance_id = %options.instance_id, phase = %DestroyPhase::Done, "Destroy phase");
    Ok(DestroyOutcome {
        instance,
        final_snapshot_id,
        waited: options.wait_for_deletion,
    })
}
