//! RDS instance and snapshot management

mod instance;
mod operations;
mod snapshot;
mod types;

pub use operations::RdsOperations;
pub use snapshot::latest_snapshot;
pub use types::{
    DeleteRequest, InstanceRecord, InstanceStatus, RestoreRequest, SecurityGroups,
    SnapshotDescriptor,
};

#[cfg(test)]
pub use operations::MockRdsOperations;

use crate::aws::context::AwsContext;
use aws_sdk_rds::Client;
use chrono::{DateTime, Utc};

/// RDS client for restoring and destroying DB instances
pub struct RdsClient {
    pub(crate) client: Client,
}

impl RdsClient {
    /// Create a new RDS client (loads AWS config from environment)
    pub async fn new(region: &str) -> Self {
        let ctx = AwsContext::new(region).await;
        Self::from_context(&ctx)
    }

    /// Create an RDS client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.rds_client(),
        }
    }
}

/// Convert an SDK timestamp; out-of-range values are dropped.
pub(crate) fn to_chrono(time: &aws_sdk_rds::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}
