//! DB instance lifecycle operations

use super::types::{DeleteRequest, InstanceRecord, InstanceStatus, RestoreRequest, SecurityGroups};
use super::{RdsClient, to_chrono};
use crate::aws::error::{classify_anyhow_error, sdk_error};
use crate::aws::tags::rds_tags;
use anyhow::{Context, Result};
use aws_sdk_rds::types::DbInstance;
use tracing::{debug, info};

impl RdsClient {
    /// Restore a new DB instance from a snapshot
    pub async fn restore_from_snapshot(&self, request: RestoreRequest) -> Result<InstanceRecord> {
        info!(
            instance_id = %request.instance_id,
            snapshot_id = %request.snapshot_id,
            instance_class = ?request.instance_class,
            port = ?request.port,
            iops = ?request.iops,
            storage_type = ?request.storage_type,
            multi_az = request.multi_az,
            "Restoring DB instance from snapshot"
        );

        let mut call = self
            .client
            .restore_db_instance_from_db_snapshot()
            .db_instance_identifier(&request.instance_id)
            .db_snapshot_identifier(&request.snapshot_id)
            .set_db_instance_class(request.instance_class.clone())
            .set_db_name(request.db_name.clone())
            .set_port(request.port)
            .set_iops(request.iops)
            .set_storage_type(request.storage_type.clone())
            .set_tags(Some(rds_tags(&request.tags)));

        if request.multi_az {
            call = call.multi_az(true);
        }

        let response = call.send().await.map_err(sdk_error).with_context(|| {
            format!(
                "Failed to restore {} from snapshot {}",
                request.instance_id, request.snapshot_id
            )
        })?;

        let instance = response
            .db_instance()
            .context("No DB instance returned from restore")?;

        instance_record(instance)
    }

    /// Describe a DB instance, returning `None` when it does not exist
    pub async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceRecord>> {
        let response = self
            .client
            .describe_db_instances()
            .db_instance_identifier(instance_id)
            .send()
            .await;

        match response {
            Ok(resp) => match resp.db_instances().first() {
                Some(instance) => {
                    let record = instance_record(instance)?;
                    debug!(instance_id = %instance_id, status = %record.status, "Described DB instance");
                    Ok(Some(record))
                }
                None => Ok(None),
            },
            Err(e) => {
                let err = sdk_error(e);
                if classify_anyhow_error(&err).is_some_and(|aws| aws.is_not_found()) {
                    debug!(instance_id = %instance_id, "DB instance not found");
                    Ok(None)
                } else {
                    Err(err.context(format!("Failed to describe DB instance {instance_id}")))
                }
            }
        }
    }

    /// Attach security groups to an instance, applied immediately
    pub async fn modify_security_groups(
        &self,
        instance_id: &str,
        groups: SecurityGroups,
    ) -> Result<InstanceRecord> {
        info!(
            instance_id = %instance_id,
            vpc_security_groups = ?groups.vpc_security_group_ids,
            db_security_groups = ?groups.db_security_group_names,
            "Applying security groups"
        );

        let vpc = Some(groups.vpc_security_group_ids).filter(|g| !g.is_empty());
        let db = Some(groups.db_security_group_names).filter(|g| !g.is_empty());

        let response = self
            .client
            .modify_db_instance()
            .db_instance_identifier(instance_id)
            .set_vpc_security_group_ids(vpc)
            .set_db_security_groups(db)
            .apply_immediately(true)
            .send()
            .await
            .map_err(sdk_error)
            .with_context(|| format!("Failed to modify security groups of {instance_id}"))?;

        let instance = response
            .db_instance()
            .context("No DB instance returned from modify")?;

        instance_record(instance)
    }

    /// Delete a DB instance, optionally taking a final snapshot
    pub async fn delete_instance(&self, request: DeleteRequest) -> Result<InstanceRecord> {
        info!(
            instance_id = %request.instance_id,
            skip_final_snapshot = request.skip_final_snapshot,
            final_snapshot_id = ?request.final_snapshot_id,
            "Deleting DB instance"
        );

        let response = self
            .client
            .delete_db_instance()
            .db_instance_identifier(&request.instance_id)
            .skip_final_snapshot(request.skip_final_snapshot)
            .set_final_db_snapshot_identifier(request.final_snapshot_id.clone())
            .send()
            .await
            .map_err(sdk_error)
            .with_context(|| format!("Failed to delete DB instance {}", request.instance_id))?;

        let instance = response
            .db_instance()
            .context("No DB instance returned from delete")?;

        instance_record(instance)
    }
}

/// Convert an SDK instance into an [`InstanceRecord`].
pub(crate) fn instance_record(instance: &DbInstance) -> Result<InstanceRecord> {
    let instance_id = instance
        .db_instance_identifier()
        .context("DB instance without identifier")?;

    let endpoint = instance.endpoint();
    let port = endpoint
        .and_then(|e| e.port())
        .or(instance.db_instance_port().filter(|p| *p > 0));

    Ok(InstanceRecord {
        instance_id: instance_id.to_string(),
        status: InstanceStatus::from(instance.db_instance_status().unwrap_or("unknown")),
        instance_class: instance.db_instance_class().map(str::to_string),
        engine: instance.engine().map(str::to_string),
        db_name: instance.db_name().map(str::to_string),
        endpoint_address: endpoint.and_then(|e| e.address()).map(str::to_string),
        port,
        iops: instance.iops(),
        storage_type: instance.storage_type().map(str::to_string),
        multi_az: instance.multi_az().unwrap_or(false),
        db_security_groups: instance
            .db_security_groups()
            .iter()
            .filter_map(|g| g.db_security_group_name())
            .map(str::to_string)
            .collect(),
        vpc_security_groups: instance
            .vpc_security_groups()
            .iter()
            .filter_map(|g| g.vpc_security_group_id())
            .map(str::to_string)
            .collect(),
        created_at: instance.instance_create_time().and_then(to_chrono),
    })
}
