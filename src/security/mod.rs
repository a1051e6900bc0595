// src/security/mod.rs
//! Keeps the pre-shared secret out of log output.

pub mod redaction;
pub use redaction::{redact_json_body, redact_secret};
