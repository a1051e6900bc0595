// tests/util.rs
// Shared helpers for the integration tests

use httpmock::prelude::*;
use httpmock::Mock;
use rollup_smoke::core::config::{HarnessConfig, TimingOverrides};
use serde_json::json;

/// Config pointed at `base_url` with every wait and the transfer interval set to zero.
#[allow(dead_code)]
pub fn instant_config(base_url: &str, max_transfers: Option<u64>) -> HarnessConfig {
    HarnessConfig {
        base_url: format!("{}/", base_url),
        timing: TimingOverrides {
            register_wait_ms: Some(0),
            deposit_wait_ms: Some(0),
            withdraw_wait_ms: Some(0),
            transfer_interval_ms: Some(0),
        },
        max_transfers,
        ..Default::default()
    }
}

/// Same as [`instant_config`], rendered as a TOML file body for the binary.
#[allow(dead_code)]
pub fn instant_config_toml(base_url: &str, max_transfers: u64) -> String {
    format!(
        r#"base_url = "{}/"
max_transfers = {}

[timing]
register_wait_ms = 0
deposit_wait_ms = 0
withdraw_wait_ms = 0
transfer_interval_ms = 0
"#,
        base_url, max_transfers
    )
}

/// Mocks for every endpoint, each matching the stock request body.
#[allow(dead_code)]
pub struct ServiceMocks<'a> {
    pub setup: Mock<'a>,
    pub register: Mock<'a>,
    pub deposit: Mock<'a>,
    pub withdraw: Mock<'a>,
    pub transfer: Mock<'a>,
}

/// Mount a mock for `path` that expects `body` and answers `status` with `reply`.
#[allow(dead_code)]
pub fn mount<'a>(
    server: &'a MockServer,
    path: &str,
    body: serde_json::Value,
    status: u16,
    reply: &str,
) -> Mock<'a> {
    let path = format!("/{}", path);
    let reply = reply.to_string();
    server.mock(|when, then| {
        when.method(POST).path(path).json_body(body);
        then.status(status).body(reply);
    })
}

#[allow(dead_code)]
pub fn setup_body() -> serde_json::Value {
    json!({})
}

#[allow(dead_code)]
pub fn register_body() -> serde_json::Value {
    json!({"pubkey": "00", "psk": "00"})
}

#[allow(dead_code)]
pub fn deposit_body() -> serde_json::Value {
    json!({"to": "0", "amount": "10000", "psk": "00"})
}

#[allow(dead_code)]
pub fn withdraw_body() -> serde_json::Value {
    json!({"from": "0", "amount": "10", "psk": "00"})
}

#[allow(dead_code)]
pub fn transfer_body() -> serde_json::Value {
    json!({"from": "0", "to": "1", "amount": "9", "psk": "00"})
}

/// Every endpoint answers 200 with a recognisable tx id.
#[allow(dead_code)]
pub fn mount_all_ok(server: &MockServer) -> ServiceMocks<'_> {
    ServiceMocks {
        setup: mount(server, "setup", setup_body(), 200, "0xsetup"),
        register: mount(server, "register", register_body(), 200, "0xregister"),
        deposit: mount(server, "deposit", deposit_body(), 200, "0xdeposit"),
        withdraw: mount(server, "withdraw", withdraw_body(), 200, "0xwithdraw"),
        transfer: mount(server, "transfer", transfer_body(), 200, "0xtransfer"),
    }
}

/// A local address with nothing listening on it.
#[allow(dead_code)]
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// A local listener that accepts connections but never answers them.
///
/// Keep the returned listener alive for as long as requests should hang.
#[allow(dead_code)]
pub fn silent_base_url() -> (std::net::TcpListener, String) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    (listener, format!("http://127.0.0.1:{}", port))
}
