//! RDS operations trait for testing

use super::RdsClient;
use super::types::{
    DeleteRequest, InstanceRecord, RestoreRequest, SecurityGroups, SnapshotDescriptor,
};
use anyhow::Result;

/// Trait for the RDS calls the pipelines make, so they can be mocked in tests.
#[allow(async_fn_in_trait)] // Internal use only, Send+Sync bounds on trait are sufficient
#[cfg_attr(test, mockall::automock)]
pub trait RdsOperations: Send + Sync {
    /// List every snapshot taken of an instance
    async fn list_snapshots(&self, instance_id: &str) -> Result<Vec<SnapshotDescriptor>>;

    /// Create a new instance from a snapshot
    async fn restore_from_snapshot(&self, request: RestoreRequest) -> Result<InstanceRecord>;

    /// Describe an instance; `None` if it does not exist
    async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceRecord>>;

    /// Attach security groups to an instance, applied immediately
    async fn modify_security_groups(
        &self,
        instance_id: &str,
        groups: SecurityGroups,
    ) -> Result<InstanceRecord>;

    /// Delete an instance
    async fn delete_instance(&self, request: DeleteRequest) -> Result<InstanceRecord>;
}

impl RdsOperations for RdsClient {
    async fn list_snapshots(&self, instance_id: &str) -> Result<Vec<SnapshotDescriptor>> {
        RdsClient::list_snapshots(self, instance_id).await
    }

    async fn restore_from_snapshot(&self, request: RestoreRequest) -> Result<InstanceRecord> {
        RdsClient::restore_from_snapshot(self, request).await
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceRecord>> {
        RdsClient::describe_instance(self, instance_id).await
    }

    async fn modify_security_groups(
        &self,
        instance_id: &str,
        groups: SecurityGroups,
    ) -> Result<InstanceRecord> {
        RdsClient::modify_security_groups(self, instance_id, groups).await
    }

    async fn delete_instance(&self, request: DeleteRequest) -> Result<InstanceRecord> {
        RdsClient::delete_instance(self, request).await
    }
}
