//! The scripted smoke scenario: steps, settlement waits, local bookkeeping
//! and the runner that ties them together.

pub mod bookkeeping;
pub mod runner;
pub mod settle;
pub mod steps;

pub use bookkeeping::Bookkeeping;
pub use runner::{RunSummary, SmokeRunner, StepOutcome, StopReason, TransferPhase};
pub use settle::SettleOutcome;
pub use steps::Step;
