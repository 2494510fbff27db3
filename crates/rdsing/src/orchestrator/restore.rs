//! Restore the latest snapshot of an instance into a new instance

use super::wait_for_available;
use crate::aws::rds::latest_snapshot;
use crate::aws::tags::restore_tags;
use crate::aws::{InstanceRecord, RdsOperations, RestoreRequest, SecurityGroups, SnapshotDescriptor};
use crate::config::RestoreOptions;
use crate::wait::ensure_not_cancelled;
use crate::defaults::{MAX_INSTANCE_ID_LEN, RESTORE_MARKER};
use crate::error::RdsingError;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Steps of a restore, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorePhase {
    FetchingSnapshot,
    Restoring,
    PollingAvailable,
    ApplyingGroups,
    PollingAvailableAgain,
    Done,
}

impl fmt::Display for RestorePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RestorePhase::FetchingSnapshot => "fetching-snapshot",
            RestorePhase::Restoring => "restoring",
            RestorePhase::PollingAvailable => "polling-available",
            RestorePhase::ApplyingGroups => "applying-groups",
            RestorePhase::PollingAvailableAgain => "polling-available-2",
            RestorePhase::Done => "done",
        })
    }
}

/// Identifier for an instance restored from `source` at `now`.
pub fn restore_instance_id(source: &str, now: DateTime<Utc>) -> String {
    format!("{source}-{RESTORE_MARKER}-{}", now.timestamp())
}

/// Build the restore call: overrides win, otherwise port, IOPS and storage
/// type follow the snapshot.
pub fn build_restore_request(
    options: &RestoreOptions,
    snapshot: &SnapshotDescriptor,
    now: DateTime<Utc>,
) -> RestoreRequest {
    let overrides = &options.overrides;
    let source = if snapshot.instance_id.is_empty() {
        options.source_instance.as_str()
    } else {
        snapshot.instance_id.as_str()
    };

    RestoreRequest {
        instance_id: restore_instance_id(source, now),
        snapshot_id: snapshot.snapshot_id.clone(),
        instance_class: overrides.instance_class.clone(),
        db_name: overrides.db_name.clone(),
        port: overrides.port.or(snapshot.port),
        iops: overrides.iops.or(snapshot.iops),
        storage_type: overrides
            .storage_type
            .clone()
            .or_else(|| snapshot.storage_type.clone()),
        multi_az: overrides.multi_az,
        tags: restore_tags(source, &snapshot.snapshot_id, now),
    }
}

/// Reject a source whose restored identifier RDS would refuse.
pub fn validate_restore_source(source: &str, now: DateTime<Utc>) -> Result<(), RdsingError> {
    let invalid = |reason: String| RdsingError::InvalidName {
        kind: "source DB instance",
        name: source.to_string(),
        reason,
    };

    if source.trim().is_empty() {
        return Err(invalid("must not be blank".to_string()));
    }
    let restored = restore_instance_id(source, now);
    if restored.len() > MAX_INSTANCE_ID_LEN {
        let max_source = MAX_INSTANCE_ID_LEN - (restored.len() - source.len());
        return Err(invalid(format!(
            "restored identifier {restored} exceeds {MAX_INSTANCE_ID_LEN} characters; \
             source names are limited to {max_source}"
        )));
    }
    Ok(())
}

fn enter(phase: RestorePhase, source: &str) {
    info!(source_instance = %source, phase = %phase, "Restore phase");
}

/// Restore the most recent snapshot of `options.source_instance`.
///
/// Returns the instance as last observed, once it is available with the
/// requested security groups attached.
pub async fn restore<R: RdsOperations>(
    rds: &R,
    options: &RestoreOptions,
    cancel: Option<&CancellationToken>,
) -> Result<InstanceRecord> {
    let source = options.source_instance.as_str();
    validate_restore_source(source, Utc::now())?;

    enter(RestorePhase::FetchingSnapshot, source);
    let snapshots = rds
        .list_snapshots(source)
        .await
        .with_context(|| format!("Failed to list snapshots of {source}"))?;
    let snapshot = latest_snapshot(source, snapshots)?;
    info!(
        snapshot_id = %snapshot.snapshot_id,
        created_at = ?snapshot.created_at,
        "Restoring the latest snapshot available"
    );

    enter(RestorePhase::Restoring, source);
    let request = build_restore_request(options, &snapshot, Utc::now());
    let instance_id = request.instance_id.clone();
    ensure_not_cancelled(cancel, &format!("restore of {instance_id}"))?;
    let created = rds
        .restore_from_snapshot(request)
        .await
        .with_context(|| format!("Failed to restore snapshot {}", snapshot.snapshot_id))?;
    info!(instance_id = %created.instance_id, status = %created.status, "Restore requested");

    let result = finish_restore(rds, options, &instance_id, cancel).await;
    if let Err(e) = &result {
        warn!(
            instance_id = %instance_id,
            error = %e,
            "Restore did not complete; the new DB instance is left in place"
        );
    }
    result
}

/// Steps after the instance exists: wait, attach groups, wait again.
async fn finish_restore<R: RdsOperations>(
    rds: &R,
    options: &RestoreOptions,
    instance_id: &str,
    cancel: Option<&CancellationToken>,
) -> Result<InstanceRecord> {
    let source = options.source_instance.as_str();

    enter(RestorePhase::PollingAvailable, source);
    let instance = wait_for_available(rds, instance_id, &options.wait, cancel)
        .await
        .with_context(|| format!("DB instance {instance_id} did not become available"))?;

    let groups = SecurityGroups::from_names(&options.groups);
    if groups.is_empty() {
        enter(RestorePhase::Done, source);
        return Ok(instance);
    }

    enter(RestorePhase::ApplyingGroups, source);
    info!(instance_id = %instance_id, count = groups.len(), "Adding security groups");
    ensure_not_cancelled(cancel, &format!("adding security groups to {instance_id}"))?;
    rds.modify_security_groups(instance_id, groups)
        .await
        .with_context(|| format!("Failed to add security groups to {instance_id}"))?;

    enter(RestorePhase::PollingAvailableAgain, source);
    let instance = wait_for_available(rds, instance_id, &options.wait, cancel)
        .await
        .with_context(|| {
            format!("DB instance {instance_id} did not become available after adding security groups")
        })?;

    enter(RestorePhase::Done, source);
    Ok(instance)
}
