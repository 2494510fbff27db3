//! Configuration types for the restore and destroy pipelines

use crate::wait::WaitConfig;

/// AWS connection settings
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// AWS region
    pub region: String,
    /// AWS profile name (overrides default credential resolution)
    pub profile: Option<String>,
}

/// Caller overrides for a restore; `None` means "take it from the snapshot"
/// (port, IOPS, storage type) or "let RDS decide" (class, DB name).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreOverrides {
    pub instance_class: Option<String>,
    pub db_name: Option<String>,
    pub port: Option<i32>,
    pub iops: Option<i32>,
    pub storage_type: Option<String>,
    pub multi_az: bool,
}

/// Configuration for a restore run
#[derive(Debug, Clone)]
pub struct RestoreOptions {
    /// Instance whose latest snapshot is restored
    pub source_instance: String,
    pub overrides: RestoreOverrides,
    /// Security groups to attach once the instance is available
    pub groups: Vec<String>,
    pub wait: WaitConfig,
}

impl RestoreOptions {
    pub fn new(source_instance: impl Into<String>) -> Self {
        Self {
            source_instance: source_instance.into(),
            overrides: RestoreOverrides::default(),
            groups: Vec::new(),
            wait: WaitConfig::default(),
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }
}

/// Configuration for a destroy run
#[derive(Debug, Clone)]
pub struct DestroyOptions {
    /// Instance to delete
    pub instance_id: String,
    /// Name of the final snapshot; `None` skips it
    pub final_snapshot: Option<String>,
    /// Poll until the instance is gone instead of returning on acknowledgement
    pub wait_for_deletion: bool,
    pub wait: WaitConfig,
}

impl DestroyOptions {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            final_snapshot: None,
            wait_for_deletion: false,
            wait: WaitConfig::default(),
        }
    }

    pub fn with_final_snapshot(mut self, name: impl Into<String>) -> Self {
        self.final_snapshot = Some(name.into());
        self
    }
}
