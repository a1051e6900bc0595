use std::fmt;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::core::config::{HarnessConfig, Timings};
use crate::core::errors::{HarnessError, Result};
use crate::harness::bookkeeping::Bookkeeping;
use crate::harness::settle::{settle, sleep_or_cancel, SettleOutcome};
use crate::harness::steps::Step;
use crate::network::requests::{
    DepositRequest, RegisterRequest, SetupRequest, TransferRequest, WithdrawRequest,
};
use crate::network::LedgerClient;

/// Why a run ended without a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The cancellation token fired.
    Cancelled,
    /// `max_transfers` accepted transfers were sent.
    TransferLimit,
}

/// Whether a scripted step ran to completion or was cut short by cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Cancelled,
}

/// Totals reported when a run stops cleanly.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Final value of the run counter.
    pub requests: u64,
    pub transfers: u64,
    /// `None` when the run stopped before the transfer phase.
    pub bookkeeping: Option<Bookkeeping>,
    pub stop_reason: StopReason,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = self.finished_at - self.started_at;
        write!(
            f,
            "summary: {} requests ok, {} transfers, stopped by {:?} after {}s",
            self.requests,
            self.transfers,
            self.stop_reason,
            elapsed.num_seconds()
        )?;
        if let Some(books) = &self.bookkeeping {
            write!(f, ", t_amount={} s_amount={}", books.t_amount, books.s_amount)?;
        }
        Ok(())
    }
}

/// Outcome of the transfer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPhase {
    pub transfers: u64,
    pub bookkeeping: Bookkeeping,
    pub stop_reason: StopReason,
}

/// Drives the scripted scenario against one service instance.
///
/// Accepted responses are written to `out` as `<counter> <body>`; a rejected
/// step writes its fixed failure line and ends the run with
/// [`HarnessError::StepFailed`]. Every request races the cancellation token,
/// so a hung service never blocks shutdown.
pub struct SmokeRunner<W: Write> {
    client: LedgerClient,
    config: HarnessConfig,
    timings: Timings,
    out: W,
    counter: u64,
    cancel: CancellationToken,
    run_id: Uuid,
}

impl<W: Write> SmokeRunner<W> {
    pub fn new(config: HarnessConfig, out: W, cancel: CancellationToken) -> Result<Self> {
        let client = LedgerClient::from_config(&config)?;
        Ok(Self::with_client(client, config, out, cancel))
    }

    pub fn with_client(
        client: LedgerClient,
        config: HarnessConfig,
        out: W,
        cancel: CancellationToken,
    ) -> Self {
        let timings = config.timings();
        Self {
            client,
            config,
            timings,
            out,
            counter: 0,
            cancel,
            run_id: Uuid::new_v4(),
        }
    }

    /// Requests accepted so far.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Send one step and apply the 200-only success rule.
    ///
    /// A token that is already cancelled wins over sending.
    async fn call<B: Serialize>(&mut self, step: Step, body: &B) -> Result<StepOutcome> {
        let cancel = self.cancel.clone();
        let resp = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(step = %step, "Cancelled before the step completed");
                return Ok(StepOutcome::Cancelled);
            }
            resp = self.client.post(step, body) => resp?,
        };

        if resp.is_accepted() {
            self.counter += 1;
            writeln!(self.out, "{} {}", self.counter, resp.body)?;
            self.out.flush()?;
            Ok(StepOutcome::Completed)
        } else {
            tracing::warn!(step = %step, status = resp.status.as_u16(), "Step rejected");
            writeln!(self.out, "{}", step.failure_message())?;
            self.out.flush()?;
            Err(HarnessError::StepFailed {
                step,
                status: resp.status.as_u16(),
            })
        }
    }

    pub async fn setup(&mut self) -> Result<StepOutcome> {
        tracing::info!("{}", Step::Setup.banner());
        let outcome = self.call(Step::Setup, &SetupRequest {}).await?;
        if outcome == StepOutcome::Completed {
            tracing::info!("Setup ok");
        }
        Ok(outcome)
    }

    /// Register `register_count` accounts with the same payload.
    pub async fn register(&mut self) -> Result<StepOutcome> {
        let count = self.config.register_count;
        tracing::info!(count, "{}", Step::Register.banner());
        let body = RegisterRequest::from_config(&self.config);
        for _ in 0..count {
            if self.call(Step::Register, &body).await? == StepOutcome::Cancelled {
                return Ok(StepOutcome::Cancelled);
            }
        }
        Ok(StepOutcome::Completed)
    }

    pub async fn deposit(&mut self) -> Result<StepOutcome> {
        tracing::info!(
            amount = self.config.amounts.deposit,
            "{}",
            Step::Deposit.banner()
        );
        let body = DepositRequest::from_config(&self.config);
        self.call(Step::Deposit, &body).await
    }

    pub async fn withdraw(&mut self) -> Result<StepOutcome> {
        tracing::info!(
            amount = self.config.amounts.withdraw,
            "{}",
            Step::Withdraw.banner()
        );
        let body = WithdrawRequest::from_config(&self.config);
        self.call(Step::Withdraw, &body).await
    }

    async fn settle_after(&self, step: Step) -> Result<SettleOutcome> {
        let wait = match step {
            Step::Register => self.timings.register_wait,
            Step::Deposit => self.timings.deposit_wait,
            Step::Withdraw => self.timings.withdraw_wait,
            Step::Setup | Step::Transfer => return Ok(SettleOutcome::Settled),
        };
        settle(&self.client, &self.config.settlement, step, wait, &self.cancel).await
    }

    /// Send a transfer every interval until cancelled, the limit is hit, or one fails.
    ///
    /// The interval is slept before each send.
    pub async fn transfer_loop(&mut self) -> Result<TransferPhase> {
        let interval = self.timings.transfer_interval;
        let limit = self.config.max_transfers;
        let amount = self.config.amounts.transfer;
        let body = TransferRequest::from_config(&self.config);
        let cancel = self.cancel.clone();

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            "{}",
            Step::Transfer.banner()
        );

        let mut books = Bookkeeping::new(self.config.amounts.deposit);
        let mut transfers = 0u64;

        let stop_reason = loop {
            if limit.is_some_and(|max| transfers >= max) {
                break StopReason::TransferLimit;
            }
            if sleep_or_cancel(interval, &cancel).await {
                break StopReason::Cancelled;
            }
            if self.call(Step::Transfer, &body).await? == StepOutcome::Cancelled {
                break StopReason::Cancelled;
            }
            transfers += 1;
            books.record_transfer(amount);
            tracing::debug!(
                transfers,
                t_amount = %books.t_amount,
                s_amount = %books.s_amount,
                "Transfer accepted"
            );
        };

        Ok(TransferPhase {
            transfers,
            bookkeeping: books,
            stop_reason,
        })
    }

    /// Run the whole scenario: setup, register, deposit, withdraw, then the transfer loop.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let span = tracing::info_span!("run", run_id = %self.run_id);
        let started_at = Utc::now();
        let phase = self.run_phases().instrument(span).await?;

        let summary = RunSummary {
            run_id: self.run_id,
            started_at,
            finished_at: Utc::now(),
            requests: self.counter,
            transfers: phase.map(|p| p.transfers).unwrap_or(0),
            bookkeeping: phase.map(|p| p.bookkeeping),
            stop_reason: phase.map(|p| p.stop_reason).unwrap_or(StopReason::Cancelled),
        };
        tracing::info!(
            requests = summary.requests,
            transfers = summary.transfers,
            "Run finished"
        );
        Ok(summary)
    }

    /// Returns `None` when cancelled before the transfer phase.
    async fn run_phases(&mut self) -> Result<Option<TransferPhase>> {
        if self.setup().await? == StepOutcome::Cancelled {
            return Ok(None);
        }

        for step in [Step::Register, Step::Deposit, Step::Withdraw] {
            let outcome = match step {
                Step::Register => self.register().await?,
                Step::Deposit => self.deposit().await?,
                _ => self.withdraw().await?,
            };
            if outcome == StepOutcome::Cancelled {
                return Ok(None);
            }
            if self.settle_after(step).await? == SettleOutcome::Cancelled {
                return Ok(None);
            }
        }

        self.transfer_loop().await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(bookkeeping: Option<Bookkeeping>) -> RunSummary {
        let now = Utc::now();
        RunSummary {
            run_id: Uuid::nil(),
            started_at: now,
            finished_at: now,
            requests: 6,
            transfers: 2,
            bookkeeping,
            stop_reason: StopReason::TransferLimit,
        }
    }

    #[test]
    fn test_summary_display_with_books() {
        let books = Bookkeeping {
            t_amount: 9_982,
            s_amount: 18,
        };
        let line = summary(Some(books)).to_string();
        assert_eq!(
            line,
            "summary: 6 requests ok, 2 transfers, stopped by TransferLimit after 0s, \
             t_amount=9982 s_amount=18"
        );
    }

    #[test]
    fn test_summary_display_without_books() {
        let line = summary(None).to_string();
        assert!(line.ends_with("after 0s"));
    }

    #[test]
    fn test_summary_serializes_stop_reason() {
        let v = serde_json::to_value(summary(None)).unwrap();
        assert_eq!(v["stop_reason"], "transfer_limit");
        assert!(v["bookkeeping"].is_null());
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        let cfg = HarnessConfig {
            base_url: "nope".to_string(),
            ..Default::default()
        };
        let res = SmokeRunner::new(cfg, Vec::new(), CancellationToken::new());
        assert!(matches!(res, Err(HarnessError::Config(_))));
    }

    #[tokio::test]
    async fn test_cancelled_token_sends_nothing() {
        // Nothing listens here; a cancelled token must win before any connect.
        let client = LedgerClient::new("http://127.0.0.1:9/").unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let mut runner =
            SmokeRunner::with_client(client, HarnessConfig::default(), Vec::new(), token);

        assert_eq!(runner.setup().await.unwrap(), StepOutcome::Cancelled);
        assert_eq!(runner.counter(), 0);
        assert!(runner.into_output().is_empty());
    }
}
