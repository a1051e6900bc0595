pub mod ledger_client;
pub mod requests;

pub use ledger_client::{LedgerClient, StepResponse};
