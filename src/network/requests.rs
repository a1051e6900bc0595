//! JSON bodies accepted by the rollup wallet endpoints.
//!
//! Every value travels as a string, amounts included.

use serde::Serialize;

use crate::core::config::HarnessConfig;

/// `POST /setup` takes an empty object.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SetupRequest {}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub pubkey: String,
    pub psk: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepositRequest {
    pub to: String,
    pub amount: String,
    pub psk: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WithdrawRequest {
    pub from: String,
    pub amount: String,
    pub psk: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: String,
    pub psk: String,
}

impl RegisterRequest {
    pub fn from_config(cfg: &HarnessConfig) -> Self {
        Self {
            pubkey: cfg.pubkey.clone(),
            psk: cfg.psk.clone(),
        }
    }
}

impl DepositRequest {
    pub fn from_config(cfg: &HarnessConfig) -> Self {
        Self {
            to: cfg.accounts.sender.clone(),
            amount: cfg.amounts.deposit.to_string(),
            psk: cfg.psk.clone(),
        }
    }
}

impl WithdrawRequest {
    pub fn from_config(cfg: &HarnessConfig) -> Self {
        Self {
            from: cfg.accounts.sender.clone(),
            amount: cfg.amounts.withdraw.to_string(),
            psk: cfg.psk.clone(),
        }
    }
}

impl TransferRequest {
    pub fn from_config(cfg: &HarnessConfig) -> Self {
        Self {
            from: cfg.accounts.sender.clone(),
            to: cfg.accounts.receiver.clone(),
            amount: cfg.amounts.transfer.to_string(),
            psk: cfg.psk.clone(),
        }
    }
}
