//! RDS resource tags applied to restored instances
//!
//! | Tag Key | Description |
//! |---------|-------------|
//! | `rdsing:tool` | Static identifier ("rdsing") |
//! | `rdsing:source-instance` | Instance the snapshot was taken from |
//! | `rdsing:source-snapshot` | Snapshot the instance was restored from |
//! | `rdsing:created-at` | RFC 3339 restore timestamp |

use aws_sdk_rds::types::Tag;
use chrono::{DateTime, Utc};

/// Tag key for tool identification
pub const TAG_TOOL: &str = "rdsing:tool";

/// Tag value for tool identification
pub const TAG_TOOL_VALUE: &str = "rdsing";

/// Tag key for the instance the snapshot belongs to
pub const TAG_SOURCE_INSTANCE: &str = "rdsing:source-instance";

/// Tag key for the snapshot the instance was restored from
pub const TAG_SOURCE_SNAPSHOT: &str = "rdsing:source-snapshot";

/// Tag key for creation timestamp (RFC 3339 format)
pub const TAG_CREATED_AT: &str = "rdsing:created-at";

/// Helper to format creation timestamp for tags
pub fn format_created_at(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Key/value pairs for an instance restored from `snapshot_id`.
pub fn restore_tags(
    source_instance: &str,
    snapshot_id: &str,
    created_at: DateTime<Utc>,
) -> Vec<(String, String)> {
    vec![
        (TAG_TOOL.to_string(), TAG_TOOL_VALUE.to_string()),
        (TAG_SOURCE_INSTANCE.to_string(), source_instance.to_string()),
        (TAG_SOURCE_SNAPSHOT.to_string(), snapshot_id.to_string()),
        (TAG_CREATED_AT.to_string(), format_created_at(created_at)),
    ]
}

/// Build RDS SDK tags from key/value pairs.
pub fn rds_tags(pairs: &[(String, String)]) -> Vec<Tag> {
    pairs
        .iter()
        .map(|(key, value)| Tag::builder().key(key).value(value).build())
        .collect()
}
