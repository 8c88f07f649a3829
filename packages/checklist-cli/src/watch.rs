//! Follow a submitted check until the server settles it
//!
//! Polls the check listing on a fixed interval and stops when the check is
//! approved or rejected, when the session is gone, or on Ctrl+C.

use std::future::Future;

use anyhow::{Result, bail};
use checklist_core::{ApiClient, ApiError, Check};
use tokio::time::{Duration, MissedTickBehavior, interval};

pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Poll until `check_id` reaches a final status or Ctrl+C is pressed.
pub async fn watch_check(
    client: &ApiClient,
    check_id: i64,
    interval_secs: u64,
) -> Result<Option<Check>> {
    watch_until(client, check_id, interval_secs, tokio::signal::ctrl_c()).await
}

/// Poll until `check_id` reaches a final status.
///
/// Returns `None` once `shutdown` completes, including while a poll is in
/// flight. Transient failures are logged and polling continues; a lost
/// session ends the watch with an error.
pub async fn watch_until<S: Future>(
    client: &ApiClient,
    check_id: i64,
    interval_secs: u64,
    shutdown: S,
) -> Result<Option<Check>> {
    let interval_secs = interval_secs.max(1);
    let mut ticker = interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        "Watching check #{} every {}s (Ctrl+C to stop)",
        check_id,
        interval_secs
    );

    tokio::pin!(shutdown);
    let mut last_status = None;

    loop {
        let poll = async {
            ticker.tick().await;
            client.find_check(check_id).await
        };

        let result = tokio::select! {
            result = poll => result,
            _ = &mut shutdown => {
                tracing::info!("Received Ctrl+C, stopping watch");
                return Ok(None);
            }
        };

        match result {
            Ok(Some(check)) => {
                if last_status != Some(check.status) {
                    tracing::info!("Check #{} is {}", check_id, check.status);
                    last_status = Some(check.status);
                }
                if check.status.is_final() {
                    return Ok(Some(check));
                }
            }
            Ok(None) => bail!("Check #{} not found", check_id),
            Err(ApiError::Unauthorized) => {
                tracing::warn!("Session expired, stopping watch");
                bail!("Session expired. Run 'checklist login' to sign in again.");
            }
            Err(e) => {
                tracing::warn!("Poll failed: {}", e);
                // Keep polling, might be a temporary network issue
            }
        }
    }
}
