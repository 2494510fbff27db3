//! Shared test utilities for rdsing
//!
//! Helpers for the live-AWS integration tests that must not live in the
//! main crate.
//!
//! ## Modules
//!
//! - [`aws`]: region and source-instance selection, RDS-safe identifiers

pub mod aws;

pub use aws::{
    get_test_region, test_instance_id, test_run_id, test_snapshot_name, test_source_instance,
};
