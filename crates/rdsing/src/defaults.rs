//! Default configuration values

/// Region used when `--region` is not given
pub const DEFAULT_REGION: &str = "us-east-1";

/// Marker placed between the source identifier and the timestamp of a
/// restored instance (`<source>-rdsing-<unix seconds>`)
pub const RESTORE_MARKER: &str = "rdsing";

/// Seconds between two instance status checks
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Maximum number of status checks per wait (one hour at the default interval)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;

/// Upper bound on a single wait, in seconds
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 3600;

/// Status RDS reports once an instance accepts connections
pub const AVAILABLE_STATUS: &str = "available";

/// Longest DB instance identifier RDS accepts
pub const MAX_INSTANCE_ID_LEN: usize = 63;

/// Longest DB snapshot identifier RDS accepts
pub const MAX_SNAPSHOT_ID_LEN: usize = 255;
