pub mod config;
pub mod errors;

pub use config::{HarnessConfig, SettlementConfig, TimingProfile, Timings};
pub use errors::{HarnessError, Result};
