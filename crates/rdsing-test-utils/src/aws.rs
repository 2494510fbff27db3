//! Live RDS test helpers
//!
//! Region and source-instance selection for the ignored AWS tests, plus
//! identifiers that satisfy RDS naming rules so a test never fails on a
//! rejected name before reaching the behaviour it checks.

use chrono::Utc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Region used when no environment variable picks one
pub const DEFAULT_TEST_REGION: &str = "us-east-1";

/// Instance whose snapshots the restore lifecycle test restores
pub const SOURCE_INSTANCE_VAR: &str = "RDSING_TEST_SOURCE_INSTANCE";

/// Region for live tests.
///
/// `RDSING_TEST_REGION` wins so the tests can target a sandbox region without
/// changing the operator's default; then `AWS_REGION`, `AWS_DEFAULT_REGION`.
pub fn get_test_region() -> String {
    region_from(|key| std::env::var(key).ok())
}

fn region_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    ["RDSING_TEST_REGION", "AWS_REGION", "AWS_DEFAULT_REGION"]
        .into_iter()
        .filter_map(lookup)
        .find(|region| !region.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TEST_REGION.to_string())
}

/// Source instance for restore tests, if the environment names one.
pub fn test_source_instance() -> Option<String> {
    std::env::var(SOURCE_INSTANCE_VAR)
        .ok()
        .filter(|name| !name.trim().is_empty())
}

/// Unique, identifier-safe run id: `t{unix seconds}{counter:03}`.
///
/// Digits only after a leading letter, so it can be embedded anywhere in an
/// RDS identifier.
pub fn test_run_id() -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let secs = Utc::now().timestamp();
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed) % 1000;
    format!("t{secs}{counter:03}")
}

/// A DB instance identifier that cannot collide with a real instance.
///
/// ```
/// use rdsing_test_utils::aws::test_instance_id;
///
/// let id = test_instance_id();
/// assert!(id.starts_with("rdsing-test-"));
/// assert!(id.len() <= 63);
/// ```
pub fn test_instance_id() -> String {
    format!("rdsing-test-{}", test_run_id())
}

/// A final snapshot name for destroy tests.
pub fn test_snapshot_name(instance_id: &str) -> String {
    format!("{instance_id}-final")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn region_prefers_test_override() {
        let lookup = env(&[("RDSING_TEST_REGION", "eu-west-1"), ("AWS_REGION", "us-west-2")]);
        assert_eq!(region_from(lookup), "eu-west-1");
    }

    #[test]
    fn region_falls_back_in_order() {
        assert_eq!(region_from(env(&[("AWS_DEFAULT_REGION", "ap-south-1")])), "ap-south-1");
        assert_eq!(region_from(env(&[("AWS_REGION", " ")])), DEFAULT_TEST_REGION);
        assert_eq!(region_from(env(&[])), DEFAULT_TEST_REGION);
    }

    #[test]
    fn run_ids_are_unique_and_identifier_safe() {
        let a = test_run_id();
        let b = test_run_id();
        assert_ne!(a, b);
        assert!(a.starts_with('t'));
        assert!(a[1..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn instance_ids_follow_rds_rules() {
        let id = test_instance_id();
        assert!(id.chars().next().is_some_and(|c| c.is_ascii_alphabetic()));
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
        assert!(!id.ends_with('-'));
        assert!(!id.contains("--"));
        assert!(test_snapshot_name(&id).len() <= 255);
    }
}
