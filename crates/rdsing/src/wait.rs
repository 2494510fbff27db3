//! Bounded fixed-interval polling with cancellation support.
//!
//! Provides a generic abstraction for waiting on an RDS resource (or any async
//! condition) to reach a target state. Every wait is bounded by both a number
//! of attempts and a wall-clock timeout.

use crate::defaults::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_WAIT_TIMEOUT_SECS,
};
use crate::error::RdsingError;
use anyhow::Result;
use backon::{BackoffBuilder, ConstantBuilder};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Configuration for a polling wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitConfig {
    /// Delay between two checks
    pub interval: Duration,
    /// Maximum number of checks, including the first one
    pub max_attempts: u32,
    /// Maximum total time to wait before timeout
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
        }
    }
}

impl WaitConfig {
    pub fn new(interval: Duration, max_attempts: u32, timeout: Duration) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
            timeout,
        }
    }
}

/// Wait for a resource to become ready, checking at a fixed interval.
///
/// The first check runs immediately. `check` returns `Ok(true)` when the
/// resource is ready and `Ok(false)` to keep waiting; an `Err` aborts the wait
/// and is returned unchanged.
///
/// # Errors
/// * [`RdsingError::WaitTimeout`] - attempts or time budget exhausted
/// * [`RdsingError::Cancelled`] - the cancellation token fired
/// * any error returned by `check`
///
/// # Example
/// ```ignore
/// wait_for_resource(
///     WaitConfig::default(),
///     Some(&cancel_token),
///     || async { Ok(instance_is_available().await?) },
///     "DB instance mydb available",
/// ).await?;
/// ```
pub async fn wait_for_resource<F, Fut>(
    config: WaitConfig,
    cancel: Option<&CancellationToken>,
    check: F,
    resource_name: &str,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();
    let max_attempts = config.max_attempts.max(1);
    let mut attempts = 0u32;

    let mut delays = ConstantBuilder::default()
        .with_delay(config.interval)
        .with_max_times(max_attempts as usize)
        .build();

    loop {
        ensure_not_cancelled(cancel, &format!("waiting for {resource_name}"))?;

        attempts += 1;

        match check().await {
            Ok(true) => {
                debug!(resource = %resource_name, attempts, "Resource ready");
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => {
                warn!(resource = %resource_name, error = %e, "Resource check failed");
                return Err(e);
            }
        }

        let elapsed = start.elapsed();
        let delay = delays.next().unwrap_or(config.interval);
        if attempts >= max_attempts || elapsed + delay > config.timeout {
            return Err(RdsingError::WaitTimeout {
                resource: resource_name.to_string(),
                elapsed,
                attempts,
            }
            .into());
        }

        debug!(
            resource = %resource_name,
            attempt = attempts,
            delay_secs = delay.as_secs(),
            "Resource not ready, polling again"
        );

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = async {
                match cancel {
                    Some(token) => token.cancelled().await,
                    None => std::future::pending::<()>().await,
                }
            } => {
                return Err(cancelled(&format!("waiting for {resource_name}")));
            }
        }
    }
}

/// Fail with [`RdsingError::Cancelled`] if the token already fired.
///
/// Called before each mutating RDS call so an interrupt never starts work
/// that would outlive the process.
pub fn ensure_not_cancelled(cancel: Option<&CancellationToken>, action: &str) -> Result<()> {
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        return Err(cancelled(action));
    }
    Ok(())
}

fn cancelled(resource_name: &str) -> anyhow::Error {
    RdsingError::Cancelled {
        resource: resource_name.to_string(),
    }
    .into()
}
