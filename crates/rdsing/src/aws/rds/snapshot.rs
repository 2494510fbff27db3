//! Snapshot lookup and selection

use super::types::SnapshotDescriptor;
use super::{RdsClient, to_chrono};
use crate::aws::error::sdk_error;
use crate::error::RdsingError;
use anyhow::{Context, Result};
use aws_sdk_rds::types::DbSnapshot;
use std::future::Future;
use tracing::debug;

impl RdsClient {
    /// List all snapshots of an instance, following pagination markers.
    pub async fn list_snapshots(&self, instance_id: &str) -> Result<Vec<SnapshotDescriptor>> {
        let snapshots = collect_pages(move |marker| async move {
            let response = self
                .client
                .describe_db_snapshots()
                .db_instance_identifier(instance_id)
                .set_marker(marker)
                .send()
                .await
                .map_err(sdk_error)
                .with_context(|| format!("Failed to describe DB snapshots of {instance_id}"))?;

            let page = response
                .db_snapshots()
                .iter()
                .map(snapshot_descriptor)
                .collect::<Result<Vec<_>>>()?;
            Ok((page, response.marker().map(str::to_string)))
        })
        .await?;

        debug!(instance_id = %instance_id, count = snapshots.len(), "Listed DB snapshots");
        Ok(snapshots)
    }
}

/// Drain a `Marker`-paginated listing.
///
/// `fetch` receives the marker of the page to load (`None` for the first one)
/// and returns that page with the next marker. An absent or empty marker ends
/// the listing.
pub(crate) async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>)>>,
{
    let mut items = Vec::new();
    let mut marker: Option<String> = None;

    loop {
        let (page, next) = fetch(marker.take()).await?;
        items.extend(page);

        match next {
            Some(next) if !next.is_empty() => marker = Some(next),
            _ => return Ok(items),
        }
    }
}

fn snapshot_descriptor(snapshot: &DbSnapshot) -> Result<SnapshotDescriptor> {
    let snapshot_id = snapshot
        .db_snapshot_identifier()
        .context("DB snapshot without identifier")?;

    Ok(SnapshotDescriptor {
        snapshot_id: snapshot_id.to_string(),
        instance_id: snapshot
            .db_instance_identifier()
            .unwrap_or_default()
            .to_string(),
        created_at: snapshot.snapshot_create_time().and_then(to_chrono),
        storage_type: snapshot.storage_type().map(str::to_string),
        port: snapshot.port(),
        iops: snapshot.iops(),
        status: snapshot.status().map(str::to_string),
        engine: snapshot.engine().map(str::to_string),
    })
}

/// Pick the most recent snapshot.
///
/// Snapshots without a creation time (still being created) sort first. Ties
/// go to the one listed last.
pub fn latest_snapshot(
    instance_id: &str,
    snapshots: Vec<SnapshotDescriptor>,
) -> Result<SnapshotDescriptor, RdsingError> {
    snapshots
        .into_iter()
        .max_by_key(|s| s.created_at)
        .ok_or_else(|| RdsingError::SnapshotNotFound {
            instance_id: instance_id.to_string(),
        })
}
