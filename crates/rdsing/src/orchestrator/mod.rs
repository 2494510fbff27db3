//! Restore and destroy pipelines
//!
//! Both pipelines are strictly sequential: each remote call completes before
//! the next one is issued, and the first failure aborts the run. Nothing is
//! rolled back; an instance created by a failed restore is left in place.

mod destroy;
mod restore;

pub use destroy::{DestroyOutcome, DestroyPhase, destroy, validate_final_snapshot_name};
pub use restore::{
    RestorePhase, build_restore_request, restore, restore_instance_id, validate_restore_source,
};

use crate::aws::{InstanceRecord, RdsOperations};
use crate::error::RdsingError;
use crate::wait::{WaitConfig, wait_for_resource};
use anyhow::{Context, Result};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Confirmation printed after a successful destroy
pub const DONE_MESSAGE: &str = "Done!";

/// Render a restored instance the way `restore` prints it.
pub fn render_instance(record: &InstanceRecord) -> Result<String> {
    serde_json::to_string_pretty(record).context("Failed to serialize DB instance record")
}

/// Poll an instance until its status is `available`.
///
/// Terminal statuses (failed, incompatible-*, storage-full, deleting) and a
/// vanished instance abort the wait instead of polling until the bound.
pub async fn wait_for_available<R: RdsOperations>(
    rds: &R,
    instance_id: &str,
    config: &WaitConfig,
    cancel: Option<&CancellationToken>,
) -> Result<InstanceRecord> {
    info!(
        instance_id = %instance_id,
        interval_secs = config.interval.as_secs(),
        max_attempts = config.max_attempts,
        "Waiting for DB instance to become available"
    );

    let latest: Mutex<Option<InstanceRecord>> = Mutex::new(None);

    wait_for_resource(
        config.clone(),
        cancel,
        || {
            let latest = &latest;
            async move {
                let record = rds
                    .describe_instance(instance_id)
                    .await?
                    .ok_or_else(|| RdsingError::InstanceNotFound {
                        instance_id: instance_id.to_string(),
                    })?;

                debug!(instance_id = %instance_id, status = %record.status, "Polled DB instance");

                if record.status.is_terminal() {
                    return Err(RdsingError::UnexpectedStatus {
                        instance_id: instance_id.to_string(),
                        status: record.status.to_string(),
                    }
                    .into());
                }

                let ready = record.status.is_available();
                *latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(record);
                Ok(ready)
            }
        },
        &format!("DB instance {instance_id} available"),
    )
    .await?;

    let record = latest
        .into_inner()
        .unwrap_or_else(|e| e.into_inner())
        .context("No DB instance record captured while waiting")?;

    info!(instance_id = %instance_id, "DB instance is available");
    Ok(record)
}

/// Poll until an instance no longer exists.
pub async fn wait_for_deleted<R: RdsOperations>(
    rds: &R,
    instance_id: &str,
    config: &WaitConfig,
    cancel: Option<&CancellationToken>,
) -> Result<()> {
    info!(instance_id = %instance_id, "Waiting for DB instance to be deleted");

    wait_for_resource(
        config.clone(),
        cancel,
        || async move {
            match rds.describe_instance(instance_id).await? {
                None => Ok(true),
                Some(record) => {
                    debug!(instance_id = %instance_id, status = %record.status, "Still deleting");
                    Ok(false)
                }
            }
        },
        &format!("DB instance {instance_id} deleted"),
    )
    .await?;

    info!(instance_id = %instance_id, "DB instance deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::rds::MockRdsOperations;
    use crate::aws::InstanceStatus;
    use crate::error::find_rdsing_error;
    use mockall::Sequence;
    use std::time::Duration;

    fn fast() -> WaitConfig {
        WaitConfig::new(Duration::from_millis(5), 10, Duration::from_secs(5))
    }

    fn record(status: &str) -> InstanceRecord {
        InstanceRecord::new("mydb-rdsing-1", InstanceStatus::from(status))
    }

    #[tokio::test]
    async fn completes_only_on_available() {
        let mut rds = MockRdsOperations::new();
        let mut seq = Sequence::new();
        for status in ["creating", "backing-up", "modifying", "available"] {
            rds.expect_describe_instance()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(Some(record(status))));
        }

        let result = wait_for_available(&rds, "mydb-rdsing-1", &fast(), None)
            .await
            .unwrap();
        assert!(result.status.is_available());
    }

    #[tokio::test]
    async fn never_available_times_out() {
        let mut rds = MockRdsOperations::new();
        rds.expect_describe_instance()
            .times(3)
            .returning(|_| Ok(Some(record("creating"))));

        let config = WaitConfig::new(Duration::from_millis(5), 3, Duration::from_secs(5));
        let err = wait_for_available(&rds, "mydb-rdsing-1", &config, None)
            .await
            .unwrap_err();

        assert!(find_rdsing_error(&err).is_some_and(RdsingError::is_timeout));
    }

    #[tokio::test]
    async fn terminal_status_fails_fast() {
        let mut rds = MockRdsOperations::new();
        rds.expect_describe_instance()
            .times(1)
            .returning(|_| Ok(Some(record("incompatible-restore"))));

        let err = wait_for_available(&rds, "mydb-rdsing-1", &fast(), None)
            .await
            .unwrap_err();

        match find_rdsing_error(&err) {
            Some(RdsingError::UnexpectedStatus { status, .. }) => {
                assert_eq!(status, "incompatible-restore")
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn vanished_instance_fails() {
        let mut rds = MockRdsOperations::new();
        rds.expect_describe_instance().times(1).returning(|_| Ok(None));

        let err = wait_for_available(&rds, "mydb-rdsing-1", &fast(), None)
            .await
            .unwrap_err();

        assert!(find_rdsing_error(&err).is_some_and(RdsingError::is_not_found));
    }

    #[tokio::test]
    async fn deleted_when_describe_finds_nothing() {
        let mut rds = MockRdsOperations::new();
        let mut seq = Sequence::new();
        rds.expect_describe_instance()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(record("deleting"))));
        rds.expect_describe_instance()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));

        wait_for_deleted(&rds, "mydb", &fast(), None).await.unwrap();
    }

    #[test]
    fn render_is_json() {
        let json = render_instance(&record("available")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "available");
    }
}
