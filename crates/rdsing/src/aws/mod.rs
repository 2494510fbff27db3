//! AWS client modules
//!
//! This module provides wrappers around AWS SDK clients for:
//! - RDS: snapshot lookup, restore, modify and delete of DB instances
//! - error: classification of RDS error codes
//! - tags: resource tags applied to restored instances

pub mod context;
pub mod error;
pub mod rds;
pub mod tags;

pub use context::AwsContext;
pub use error::{AwsError, classify_anyhow_error, classify_aws_error};
pub use rds::{
    DeleteRequest, InstanceRecord, InstanceStatus, RdsClient, RdsOperations, RestoreRequest,
    SecurityGroups, SnapshotDescriptor,
};
