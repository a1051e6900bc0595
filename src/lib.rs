// src/lib.rs
//! Smoke-test driver for the asvc rollup wallet service.

pub mod cli;
pub mod core;
pub mod harness;
pub mod network;
pub mod security;

pub use crate::core::{HarnessConfig, HarnessError};
pub use crate::harness::{RunSummary, SmokeRunner};
