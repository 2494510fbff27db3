//! Shared fixtures for the end-to-end command tests
//!
//! `FakeRds` is an in-memory RDS: it serves a fixed snapshot list, walks each
//! instance through a scripted status sequence and records every mutating
//! call so tests can assert on what was sent.

#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use rdsing::aws::{
    DeleteRequest, InstanceRecord, InstanceStatus, RdsOperations, RestoreRequest, SecurityGroups,
    SnapshotDescriptor,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Flags that make every wait finish in milliseconds
pub const FAST_WAIT: [&str; 6] = [
    "--poll-interval",
    "0",
    "--max-attempts",
    "10",
    "--wait-timeout",
    "5",
];

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Build an argv for `rdsing` with fast polling appended.
pub fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("rdsing")
        .chain(args.iter().copied())
        .chain(FAST_WAIT)
        .map(String::from)
        .collect()
}

/// One describe result per entry; `None` means the instance is gone.
/// The last entry repeats forever.
type Script = VecDeque<Option<InstanceStatus>>;

fn script(statuses: &[&str]) -> Script {
    statuses
        .iter()
        .map(|s| Some(InstanceStatus::from(*s)))
        .collect()
}

#[derive(Default)]
struct Inner {
    snapshots: Vec<SnapshotDescriptor>,
    scripts: HashMap<String, Script>,
    /// Script given to every newly restored instance
    restore_script: Vec<&'static str>,
    instances: HashMap<String, InstanceRecord>,
    restores: Vec<RestoreRequest>,
    modifications: Vec<(String, SecurityGroups)>,
    deletes: Vec<DeleteRequest>,
    describes: usize,
}

#[derive(Default)]
pub struct FakeRds {
    inner: Mutex<Inner>,
}

impl FakeRds {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.inner.lock().unwrap().restore_script = vec!["creating", "available"];
        fake
    }

    pub fn with_snapshots(self, snapshots: Vec<SnapshotDescriptor>) -> Self {
        self.inner.lock().unwrap().snapshots = snapshots;
        self
    }

    /// Statuses a restored instance reports before settling on the last one.
    pub fn with_restore_script(self, statuses: &[&'static str]) -> Self {
        self.inner.lock().unwrap().restore_script = statuses.to_vec();
        self
    }

    /// Register an existing instance in the `available` state.
    pub fn with_instance(self, instance_id: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.instances.insert(
                instance_id.to_string(),
                InstanceRecord::new(instance_id, InstanceStatus::Available),
            );
            inner
                .scripts
                .insert(instance_id.to_string(), script(&["available"]));
        }
        self
    }

    pub fn restores(&self) -> Vec<RestoreRequest> {
        self.inner.lock().unwrap().restores.clone()
    }

    pub fn modifications(&self) -> Vec<(String, SecurityGroups)> {
        self.inner.lock().unwrap().modifications.clone()
    }

    pub fn deletes(&self) -> Vec<DeleteRequest> {
        self.inner.lock().unwrap().deletes.clone()
    }

    pub fn describe_count(&self) -> usize {
        self.inner.lock().unwrap().describes
    }

    pub fn exists(&self, instance_id: &str) -> bool {
        self.inner.lock().unwrap().instances.contains_key(instance_id)
    }
}

impl RdsOperations for FakeRds {
    async fn list_snapshots(&self, instance_id: &str) -> Result<Vec<SnapshotDescriptor>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .snapshots
            .iter()
            .filter(|s| s.instance_id == instance_id)
            .cloned()
            .collect())
    }

    async fn restore_from_snapshot(&self, request: RestoreRequest) -> Result<InstanceRecord> {
        let mut inner = self.inner.lock().unwrap();
        if inner.instances.contains_key(&request.instance_id) {
            anyhow::bail!("DBInstanceAlreadyExists: {}", request.instance_id);
        }

        let mut record = InstanceRecord::new(&request.instance_id, InstanceStatus::Creating);
        record.instance_class = request.instance_class.clone();
        record.db_name = request.db_name.clone();
        record.port = request.port;
        record.iops = request.iops;
        record.storage_type = request.storage_type.clone();
        record.multi_az = request.multi_az;

        let restore_script = script(&inner.restore_script);
        inner.scripts.insert(request.instance_id.clone(), restore_script);
        inner
            .instances
            .insert(request.instance_id.clone(), record.clone());
        inner.restores.push(request);
        Ok(record)
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceRecord>> {
        let mut inner = self.inner.lock().unwrap();
        inner.describes += 1;

        let next = match inner.scripts.get_mut(instance_id) {
            Some(script) if script.len() > 1 => script.pop_front().flatten(),
            Some(script) => script.front().cloned().flatten(),
            None => None,
        };

        let Some(status) = next else {
            inner.instances.remove(instance_id);
            return Ok(None);
        };
        Ok(inner.instances.get_mut(instance_id).map(|record| {
            record.status = status;
            record.clone()
        }))
    }

    async fn modify_security_groups(
        &self,
        instance_id: &str,
        groups: SecurityGroups,
    ) -> Result<InstanceRecord> {
        let mut inner = self.inner.lock().unwrap();
        let Some(record) = inner.instances.get_mut(instance_id) else {
            anyhow::bail!("DBInstanceNotFound: {instance_id}");
        };
        record.vpc_security_groups = groups.vpc_security_group_ids.clone();
        record.db_security_groups = groups.db_security_group_names.clone();
        record.status = InstanceStatus::Modifying;
        let record = record.clone();

        inner
            .scripts
            .insert(instance_id.to_string(), script(&["modifying", "available"]));
        inner.modifications.push((instance_id.to_string(), groups));
        Ok(record)
    }

    async fn delete_instance(&self, request: DeleteRequest) -> Result<InstanceRecord> {
        let mut inner = self.inner.lock().unwrap();
        let Some(record) = inner.instances.get_mut(&request.instance_id) else {
            anyhow::bail!("DBInstanceNotFound: {}", request.instance_id);
        };
        record.status = InstanceStatus::Deleting;
        let record = record.clone();

        let mut gone = script(&["deleting"]);
        gone.push_back(None);
        inner.scripts.insert(request.instance_id.clone(), gone);
        inner.deletes.push(request);
        Ok(record)
    }
}
