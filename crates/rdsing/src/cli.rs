//! Command-line surface
//!
//! Argument types live in the library so the full command path (parse,
//! convert, run, render) can be exercised against a fake RDS provider.

use crate::aws::RdsOperations;
use crate::config::{AwsConfig, DestroyOptions, RestoreOptions, RestoreOverrides};
use crate::defaults::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REGION, DEFAULT_WAIT_TIMEOUT_SECS,
};
use crate::orchestrator::{self, DONE_MESSAGE};
use crate::wait::WaitConfig;
use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rdsing")]
#[command(about = "Restore the latest RDS snapshot or destroy an RDS instance")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// AWS region to use
    #[arg(short, long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Name of the target DB instance
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub name: String,

    /// AWS profile to use (overrides default credential resolution)
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Print progress while waiting
    #[arg(long)]
    pub debug: bool,

    /// Seconds between two status checks
    #[arg(long, env = "RDSING_POLL_INTERVAL", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval: u64,

    /// Maximum number of status checks per wait
    #[arg(long, env = "RDSING_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Give up waiting after this many seconds
    #[arg(long, env = "RDSING_WAIT_TIMEOUT", default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
    pub wait_timeout: u64,
}

impl CommonArgs {
    pub fn wait_config(&self) -> WaitConfig {
        WaitConfig::new(
            Duration::from_secs(self.poll_interval),
            self.max_attempts,
            Duration::from_secs(self.wait_timeout),
        )
    }

    pub fn aws_config(&self) -> AwsConfig {
        AwsConfig {
            region: self.region.clone(),
            profile: self.profile.clone(),
        }
    }
}

/// Arguments for the restore command
#[derive(clap::Args, Debug, Clone)]
pub struct RestoreArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Database name in the restored instance
    #[arg(short, long)]
    pub dbname: Option<String>,

    /// Use multiple availability zones
    #[arg(short, long)]
    pub multiaz: bool,

    /// Number of IOPS to provision. Default is the same as the snapshot
    #[arg(short, long)]
    pub iops: Option<i32>,

    /// Instance class to use. Default is the same as the snapshot's instance
    #[arg(short = 't', long)]
    pub instancetype: Option<String>,

    /// Port number to use. Default is the same as the snapshot
    #[arg(short, long)]
    pub port: Option<i32>,

    /// Security groups to add to the instance (repeatable or comma-separated);
    /// `sg-` ids are VPC security groups, other names are DB security groups
    #[arg(short, long, value_delimiter = ',')]
    pub group: Vec<String>,

    /// Storage type to use. Default is the same as the snapshot
    #[arg(long)]
    pub storage_type: Option<String>,
}

impl From<&RestoreArgs> for RestoreOptions {
    fn from(args: &RestoreArgs) -> Self {
        Self {
            source_instance: args.common.name.clone(),
            overrides: RestoreOverrides {
                instance_class: args.instancetype.clone(),
                db_name: args.dbname.clone(),
                port: args.port,
                iops: args.iops,
                storage_type: args.storage_type.clone(),
                multi_az: args.multiaz,
            },
            groups: args.group.clone(),
            wait: args.common.wait_config(),
        }
    }
}

/// Arguments for the destroy command
#[derive(clap::Args, Debug, Clone)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Take a final snapshot with this name before deleting
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub snapshot: Option<String>,

    /// Wait until the instance is fully deleted
    #[arg(long)]
    pub wait: bool,
}

impl From<&DestroyArgs> for DestroyOptions {
    fn from(args: &DestroyArgs) -> Self {
        Self {
            instance_id: args.common.name.clone(),
            final_snapshot: args.snapshot.clone(),
            wait_for_deletion: args.wait,
            wait: args.common.wait_config(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Restore the latest RDS snapshot available
    Restore(Box<RestoreArgs>),

    /// Delete an RDS instance
    Destroy(DestroyArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Restore(args) => &args.common,
            Command::Destroy(args) => &args.common,
        }
    }
}

/// Run a parsed command and return the text to print on stdout.
pub async fn execute<R: RdsOperations>(
    command: &Command,
    rds: &R,
    cancel: Option<&CancellationToken>,
) -> Result<String> {
    match command {
        Command::Restore(args) => {
            let options = RestoreOptions::from(args.as_ref());
            info!(
                source_instance = %options.source_instance,
                region = %args.common.region,
                groups = ?options.groups,
                "Starting restore"
            );
            let instance = orchestrator::restore(rds, &options, cancel).await?;
            orchestrator::render_instance(&instance)
        }
        Command::Destroy(args) => {
            let options = DestroyOptions::from(args);
            info!(
                instance_id = %options.instance_id,
                region = %args.common.region,
                final_snapshot = ?options.final_snapshot,
                "Starting destroy"
            );
            orchestrator::destroy(rds, &options, cancel).await?;
            Ok(DONE_MESSAGE.to_string())
        }
    }
}
