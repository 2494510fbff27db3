//! RDS types and request shapes
//!
//! SDK shapes are converted into these plain types at the client boundary so
//! the orchestration code and its tests never touch `aws_sdk_rds` directly.

use crate::defaults::AVAILABLE_STATUS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DB snapshot as seen at listing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDescriptor {
    pub snapshot_id: String,
    /// Instance the snapshot was taken from
    pub instance_id: String,
    /// Missing while RDS is still creating the snapshot
    pub created_at: Option<DateTime<Utc>>,
    pub storage_type: Option<String>,
    pub port: Option<i32>,
    pub iops: Option<i32>,
    pub status: Option<String>,
    pub engine: Option<String>,
}

impl SnapshotDescriptor {
    pub fn new(snapshot_id: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            instance_id: instance_id.into(),
            created_at: None,
            storage_type: None,
            port: None,
            iops: None,
            status: None,
            engine: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_storage(mut self, storage_type: impl Into<String>, iops: Option<i32>) -> Self {
        self.storage_type = Some(storage_type.into());
        self.iops = iops;
        self
    }

    pub fn with_port(mut self, port: i32) -> Self {
        self.port = Some(port);
        self
    }
}

/// DB instance lifecycle status.
///
/// Parsed from the `DBInstanceStatus` string; unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstanceStatus {
    Available,
    Creating,
    Modifying,
    BackingUp,
    Deleting,
    Failed,
    IncompatibleRestore,
    IncompatibleParameters,
    IncompatibleNetwork,
    StorageFull,
    Other(String),
}

impl InstanceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InstanceStatus::Available => AVAILABLE_STATUS,
            InstanceStatus::Creating => "creating",
            InstanceStatus::Modifying => "modifying",
            InstanceStatus::BackingUp => "backing-up",
            InstanceStatus::Deleting => "deleting",
            InstanceStatus::Failed => "failed",
            InstanceStatus::IncompatibleRestore => "incompatible-restore",
            InstanceStatus::IncompatibleParameters => "incompatible-parameters",
            InstanceStatus::IncompatibleNetwork => "incompatible-network",
            InstanceStatus::StorageFull => "storage-full",
            InstanceStatus::Other(s) => s,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, InstanceStatus::Available)
    }

    /// Statuses from which an instance never becomes available without operator action
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InstanceStatus::Deleting
                | InstanceStatus::Failed
                | InstanceStatus::IncompatibleRestore
                | InstanceStatus::IncompatibleParameters
                | InstanceStatus::IncompatibleNetwork
                | InstanceStatus::StorageFull
        )
    }
}

impl From<&str> for InstanceStatus {
    fn from(s: &str) -> Self {
        match s {
            AVAILABLE_STATUS => InstanceStatus::Available,
            "creating" => InstanceStatus::Creating,
            "modifying" => InstanceStatus::Modifying,
            "backing-up" => InstanceStatus::BackingUp,
            "deleting" => InstanceStatus::Deleting,
            "failed" => InstanceStatus::Failed,
            "incompatible-restore" => InstanceStatus::IncompatibleRestore,
            "incompatible-parameters" => InstanceStatus::IncompatibleParameters,
            "incompatible-network" => InstanceStatus::IncompatibleNetwork,
            "storage-full" => InstanceStatus::StorageFull,
            other => InstanceStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InstanceStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InstanceStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(InstanceStatus::from(s.as_str()))
    }
}

/// Point-in-time view of a DB instance; printed as JSON after a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub instance_id: String,
    pub status: InstanceStatus,
    pub instance_class: Option<String>,
    pub engine: Option<String>,
    pub db_name: Option<String>,
    pub endpoint_address: Option<String>,
    pub port: Option<i32>,
    pub iops: Option<i32>,
    pub storage_type: Option<String>,
    pub multi_az: bool,
    pub db_security_groups: Vec<String>,
    pub vpc_security_groups: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl InstanceRecord {
    pub fn new(instance_id: impl Into<String>, status: InstanceStatus) -> Self {
        Self {
            instance_id: instance_id.into(),
            status,
            instance_class: None,
            engine: None,
            db_name: None,
            endpoint_address: None,
            port: None,
            iops: None,
            storage_type: None,
            multi_az: false,
            db_security_groups: Vec::new(),
            vpc_security_groups: Vec::new(),
            created_at: None,
        }
    }
}

/// Parameters of a `RestoreDBInstanceFromDBSnapshot` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreRequest {
    /// Identifier of the instance to create
    pub instance_id: String,
    pub snapshot_id: String,
    pub instance_class: Option<String>,
    pub db_name: Option<String>,
    pub port: Option<i32>,
    pub iops: Option<i32>,
    pub storage_type: Option<String>,
    pub multi_az: bool,
    pub tags: Vec<(String, String)>,
}

/// Parameters of a `DeleteDBInstance` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub instance_id: String,
    pub skip_final_snapshot: bool,
    pub final_snapshot_id: Option<String>,
}

impl DeleteRequest {
    /// Build a delete request; a final snapshot is taken whenever a name is given.
    pub fn new(instance_id: impl Into<String>, final_snapshot_id: Option<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            skip_final_snapshot: final_snapshot_id.is_none(),
            final_snapshot_id,
        }
    }
}

/// Security groups to attach to an instance, split by kind.
///
/// Values starting with `sg-` are VPC security group ids; anything else is a
/// DB security group name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityGroups {
    pub vpc_security_group_ids: Vec<String>,
    pub db_security_group_names: Vec<String>,
}

impl SecurityGroups {
    pub fn from_names<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::default();
        for group in groups {
            let group = group.as_ref().trim();
            if group.is_empty() {
                continue;
            }
            if group.starts_with("sg-") {
                out.vpc_security_group_ids.push(group.to_string());
            } else {
                out.db_security_group_names.push(group.to_string());
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.vpc_security_group_ids.is_empty() && self.db_security_group_names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vpc_security_group_ids.len() + self.db_security_group_names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_and_display() {
        for s in [
            "available",
            "creating",
            "modifying",
            "backing-up",
            "deleting",
            "failed",
            "incompatible-restore",
            "storage-full",
        ] {
            assert_eq!(InstanceStatus::from(s).to_string(), s);
        }
        assert_eq!(
            InstanceStatus::from("configuring-enhanced-monitoring"),
            InstanceStatus::Other("configuring-enhanced-monitoring".to_string())
        );
    }

    #[test]
    fn only_available_is_available() {
        assert!(InstanceStatus::Available.is_available());
        for s in ["creating", "modifying", "backing-up", "rebooting", "Available"] {
            assert!(!InstanceStatus::from(s).is_available(), "{s}");
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(InstanceStatus::Failed.is_terminal());
        assert!(InstanceStatus::IncompatibleRestore.is_terminal());
        assert!(InstanceStatus::Deleting.is_terminal());
        assert!(!InstanceStatus::Creating.is_terminal());
        assert!(!InstanceStatus::Other("rebooting".to_string()).is_terminal());
    }

    #[test]
    fn status_serializes_as_rds_string() {
        let record = InstanceRecord::new("mydb-rdsing-1700000000", InstanceStatus::BackingUp);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "backing-up");
        assert_eq!(json["instance_id"], "mydb-rdsing-1700000000");
    }

    #[test]
    fn delete_request_without_snapshot_skips_it() {
        let req = DeleteRequest::new("mydb", None);
        assert!(req.skip_final_snapshot);
        assert_eq!(req.final_snapshot_id, None);
    }

    #[test]
    fn delete_request_with_snapshot_takes_it() {
        let req = DeleteRequest::new("mydb", Some("foo".to_string()));
        assert!(!req.skip_final_snapshot);
        assert_eq!(req.final_snapshot_id.as_deref(), Some("foo"));
    }

    #[test]
    fn delete_request_never_drops_a_given_snapshot_name() {
        let req = DeleteRequest::new("mydb", Some("  ".to_string()));
        assert!(!req.skip_final_snapshot);
        assert_eq!(req.final_snapshot_id.as_deref(), Some("  "));
    }

    #[test]
    fn security_groups_split_by_kind() {
        let groups = SecurityGroups::from_names(["sg-0abc", "default", " ", "sg-1def"]);
        assert_eq!(groups.vpc_security_group_ids, vec!["sg-0abc", "sg-1def"]);
        assert_eq!(groups.db_security_group_names, vec!["default"]);
        assert_eq!(groups.len(), 3);
        assert!(SecurityGroups::from_names(Vec::<String>::new()).is_empty());
    }
}
