use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::core::errors::{HarnessError, Result};

/// Environment variable naming a TOML config file.
pub const CONFIG_PATH_ENV: &str = "SMOKE_CONFIG";

/// Address of a locally running rollup wallet service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001/";

/// Account identifiers used as `from`/`to` in the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsConfig {
    #[serde(default = "AccountsConfig::default_sender")]
    pub sender: String,
    #[serde(default = "AccountsConfig::default_receiver")]
    pub receiver: String,
}

impl AccountsConfig {
    fn default_sender() -> String {
        "0".to_string()
    }

    fn default_receiver() -> String {
        "1".to_string()
    }
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            sender: Self::default_sender(),
            receiver: Self::default_receiver(),
        }
    }
}

/// Amounts sent by the deposit, withdraw and transfer steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountsConfig {
    #[serde(default = "AmountsConfig::default_deposit")]
    pub deposit: u64,
    #[serde(default = "AmountsConfig::default_withdraw")]
    pub withdraw: u64,
    #[serde(default = "AmountsConfig::default_transfer")]
    pub transfer: u64,
}

impl AmountsConfig {
    fn default_deposit() -> u64 {
        10_000
    }

    fn default_withdraw() -> u64 {
        10
    }

    fn default_transfer() -> u64 {
        9
    }
}

impl Default for AmountsConfig {
    fn default() -> Self {
        Self {
            deposit: Self::default_deposit(),
            withdraw: Self::default_withdraw(),
            transfer: Self::default_transfer(),
        }
    }
}

/// Built-in wait/cadence presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimingProfile {
    /// Waits after every mutating step, a transfer every 400ms.
    #[default]
    Fast,
    /// No wait after withdraw, a transfer every second.
    Steady,
}

impl TimingProfile {
    pub fn timings(&self) -> Timings {
        match self {
            TimingProfile::Fast => Timings {
                register_wait: Duration::from_secs(10),
                deposit_wait: Duration::from_secs(15),
                withdraw_wait: Duration::from_secs(15),
                transfer_interval: Duration::from_millis(400),
            },
            TimingProfile::Steady => Timings {
                register_wait: Duration::from_secs(10),
                deposit_wait: Duration::from_secs(15),
                withdraw_wait: Duration::ZERO,
                transfer_interval: Duration::from_secs(1),
            },
        }
    }
}

/// Per-value overrides of the selected profile, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingOverrides {
    pub register_wait_ms: Option<u64>,
    pub deposit_wait_ms: Option<u64>,
    pub withdraw_wait_ms: Option<u64>,
    pub transfer_interval_ms: Option<u64>,
}

/// Resolved waits. A zero wait is skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub register_wait: Duration,
    pub deposit_wait: Duration,
    pub withdraw_wait: Duration,
    pub transfer_interval: Duration,
}

/// How the harness waits for the service to settle a mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SettlementConfig {
    /// Sleep the profile duration.
    Fixed,
    /// GET `poll_path` until it answers 200, bounded by the profile duration.
    Poll {
        poll_path: String,
        #[serde(default = "SettlementConfig::default_poll_interval_ms")]
        poll_interval_ms: u64,
    },
}

impl SettlementConfig {
    fn default_poll_interval_ms() -> u64 {
        500
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        SettlementConfig::Fixed
    }
}

/// Full scenario configuration. Defaults reproduce the stock smoke run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default = "HarnessConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "HarnessConfig::default_secret")]
    pub pubkey: String,
    #[serde(default = "HarnessConfig::default_secret")]
    pub psk: String,
    #[serde(default = "HarnessConfig::default_register_count")]
    pub register_count: u32,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub amounts: AmountsConfig,
    #[serde(default)]
    pub profile: TimingProfile,
    #[serde(default)]
    pub timing: TimingOverrides,
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Stop the transfer loop after this many accepted transfers.
    #[serde(default)]
    pub max_transfers: Option<u64>,
    /// Per-request timeout; the client default applies when unset.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl HarnessConfig {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }

    fn default_secret() -> String {
        "00".to_string()
    }

    fn default_register_count() -> u32 {
        2
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| HarnessError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path`, else from `SMOKE_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let resolved = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        match resolved {
            Some(p) => {
                tracing::info!(path = %p.display(), "Loading harness config");
                Self::from_file(&p)
            }
            None => Ok(Self::default()),
        }
    }

    /// Check the config and normalise the base URL to end with `/`.
    pub fn validated(mut self) -> Result<Self> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            HarnessError::Config(format!("invalid base_url {:?}: {}", self.base_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(HarnessError::Config(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        if self.register_count == 0 {
            return Err(HarnessError::Config(
                "register_count must be at least 1".to_string(),
            ));
        }
        if let SettlementConfig::Poll { poll_interval_ms: 0, .. } = self.settlement {
            return Err(HarnessError::Config(
                "poll_interval_ms must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    /// Profile timings with any `[timing]` overrides applied.
    pub fn timings(&self) -> Timings {
        let base = self.profile.timings();
        let pick = |ms: Option<u64>, fallback: Duration| {
            ms.map(Duration::from_millis).unwrap_or(fallback)
        };
        Timings {
            register_wait: pick(self.timing.register_wait_ms, base.register_wait),
            deposit_wait: pick(self.timing.deposit_wait_ms, base.deposit_wait),
            withdraw_wait: pick(self.timing.withdraw_wait_ms, base.withdraw_wait),
            transfer_interval: pick(self.timing.transfer_interval_ms, base.transfer_interval),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            pubkey: Self::default_secret(),
            psk: Self::default_secret(),
            register_count: Self::default_register_count(),
            accounts: AccountsConfig::default(),
            amounts: AmountsConfig::default(),
            profile: TimingProfile::default(),
            timing: TimingOverrides::default(),
            settlement: SettlementConfig::default(),
            max_transfers: None,
            request_timeout_ms: None,
        }
    }
}
