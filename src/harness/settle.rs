use std::time::Duration;

use reqwest::StatusCode;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::core::config::SettlementConfig;
use crate::core::errors::{HarnessError, Result};
use crate::harness::steps::Step;
use crate::network::LedgerClient;

/// Result of waiting for the service to settle a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Settled,
    Cancelled,
}

/// Sleep for `duration` unless `cancel` fires first. Returns true when cancelled.
pub async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => true,
        _ = tokio::time::sleep(duration) => false,
    }
}

/// Wait for the effect of `step` to land upstream.
///
/// A zero `max_wait` skips the wait. With `Fixed` settlement the full
/// duration is slept; with `Poll` the status path is probed until it returns
/// 200 or `max_wait` elapses.
pub async fn settle(
    client: &LedgerClient,
    settlement: &SettlementConfig,
    step: Step,
    max_wait: Duration,
    cancel: &CancellationToken,
) -> Result<SettleOutcome> {
    if max_wait.is_zero() {
        return Ok(SettleOutcome::Settled);
    }

    match settlement {
        SettlementConfig::Fixed => {
            tracing::info!(
                step = %step,
                wait_ms = max_wait.as_millis() as u64,
                "Waiting {} onchain...",
                step
            );
            if sleep_or_cancel(max_wait, cancel).await {
                return Ok(SettleOutcome::Cancelled);
            }
            Ok(SettleOutcome::Settled)
        }
        SettlementConfig::Poll {
            poll_path,
            poll_interval_ms,
        } => {
            let interval = Duration::from_millis(*poll_interval_ms);
            poll_until_ok(client, poll_path, interval, step, max_wait, cancel).await
        }
    }
}

/// Each status request is bounded by the time left and raced against `cancel`,
/// so a service that never answers still ends in a timeout.
async fn poll_until_ok(
    client: &LedgerClient,
    path: &str,
    interval: Duration,
    step: Step,
    max_wait: Duration,
    cancel: &CancellationToken,
) -> Result<SettleOutcome> {
    tracing::info!(step = %step, path, "Polling for {} confirmation", step);
    let start = Instant::now();
    let mut attempt = 0u64;

    loop {
        attempt += 1;
        let remaining = max_wait.saturating_sub(start.elapsed());
        let probed = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(SettleOutcome::Cancelled),
            res = tokio::time::timeout(remaining, client.probe(step, path)) => res,
        };

        match probed {
            Ok(Ok(StatusCode::OK)) => {
                tracing::info!(step = %step, attempt, "Settlement confirmed");
                return Ok(SettleOutcome::Settled);
            }
            Ok(Ok(status)) => {
                tracing::debug!(
                    step = %step,
                    attempt,
                    status = status.as_u16(),
                    "Not settled yet"
                );
            }
            Ok(Err(e)) => {
                tracing::warn!(step = %step, attempt, "Settlement request failed: {}", e);
            }
            Err(_) => {
                tracing::debug!(step = %step, attempt, "Status request timed out");
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= max_wait {
            return Err(HarnessError::SettleTimeout {
                step,
                waited: elapsed,
            });
        }
        let pause = interval.min(max_wait - elapsed);
        if sleep_or_cancel(pause, cancel).await {
            return Ok(SettleOutcome::Cancelled);
        }
    }
}
