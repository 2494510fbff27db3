//! rdsing - restore and destroy AWS RDS instances
//!
//! This crate provides the `rdsing` binary's building blocks: a thin RDS
//! client, the restore/destroy pipelines and a bounded polling helper.

pub mod aws;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod orchestrator;
pub mod wait;

pub use error::RdsingError;
