//! RDS integration tests - actually call AWS APIs
//!
//! These tests are marked `#[ignore]` and only run with:
//! ```
//! AWS_PROFILE=your_profile cargo test --test aws_rds_integration -- --ignored
//! ```
//!
//! `test_restore_and_destroy_lifecycle` also needs `RDSING_TEST_SOURCE_INSTANCE`
//! naming an instance with at least one snapshot. It creates a billable
//! instance and deletes it again, leaving a `<instance>-final` snapshot.

use rdsing::aws::{DeleteRequest, RdsClient, classify_anyhow_error};
use rdsing::config::{DestroyOptions, RestoreOptions};
use rdsing::orchestrator::{destroy, restore};
use rdsing::wait::WaitConfig;
use rdsing_test_utils::{
    get_test_region, test_instance_id, test_snapshot_name, test_source_instance,
};
use std::time::Duration;

/// Timeout for a restore to become available (40 minutes)
const RESTORE_TIMEOUT_SECS: u64 = 2400;

#[tokio::test]
#[ignore]
async fn test_describe_missing_instance_is_none() {
    let client = RdsClient::new(&get_test_region()).await;

    let found = client
        .describe_instance(&test_instance_id())
        .await
        .expect("AWS credentials required - set AWS_PROFILE or AWS_ACCESS_KEY_ID");

    assert!(found.is_none(), "random instance id should not exist");
}

#[tokio::test]
#[ignore]
async fn test_list_snapshots_of_missing_instance_is_empty() {
    let client = RdsClient::new(&get_test_region()).await;

    match client.list_snapshots(&test_instance_id()).await {
        Ok(snapshots) => assert!(snapshots.is_empty()),
        Err(e) => {
            let aws = classify_anyhow_error(&e);
            assert!(
                aws.is_some_and(|err| err.is_not_found()),
                "unexpected error: {e:#}"
            );
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_delete_missing_instance_is_not_found() {
    let client = RdsClient::new(&get_test_region()).await;

    let err = client
        .delete_instance(DeleteRequest::new(test_instance_id(), None))
        .await
        .expect_err("deleting a random instance id should fail");

    let aws = classify_anyhow_error(&err).expect("should classify the RDS error");
    assert!(aws.is_not_found(), "got {aws:?}");
    assert_eq!(aws.code(), Some("DBInstanceNotFound"));
}

#[tokio::test]
#[ignore]
async fn test_restore_and_destroy_lifecycle() {
    let Some(source) = test_source_instance() else {
        println!("RDSING_TEST_SOURCE_INSTANCE not set, skipping");
        return;
    };

    let client = RdsClient::new(&get_test_region()).await;
    let wait = WaitConfig::new(
        Duration::from_secs(30),
        (RESTORE_TIMEOUT_SECS / 30) as u32,
        Duration::from_secs(RESTORE_TIMEOUT_SECS),
    );

    let options = RestoreOptions::new(&source).with_wait(wait.clone());
    let instance = restore(&client, &options, None)
        .await
        .expect("restore should complete");
    println!("Restored {}", instance.instance_id);

    assert!(instance.status.is_available());
    assert!(instance.instance_id.starts_with(&format!("{source}-rdsing-")));

    let final_snapshot = test_snapshot_name(&instance.instance_id);
    let mut destroy_options =
        DestroyOptions::new(&instance.instance_id).with_final_snapshot(&final_snapshot);
    destroy_options.wait_for_deletion = true;
    destroy_options.wait = wait;
    let outcome = destroy(&client, &destroy_options, None)
        .await
        .expect("destroy should complete");

    assert!(outcome.waited);
    assert_eq!(outcome.final_snapshot_id.as_deref(), Some(final_snapshot.as_str()));
    assert!(client.describe_instance(&instance.instance_id).await.unwrap().is_none());
}
