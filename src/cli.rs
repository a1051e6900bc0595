use clap::Parser;
use std::path::PathBuf;

use crate::core::config::{HarnessConfig, TimingProfile};

/// Rollup smoke-test CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(
    name = "rollup-smoke",
    about = "Smoke-test the rollup wallet service with a scripted transfer run",
    version
)]
pub struct Cli {
    /// TOML config file (falls back to SMOKE_CONFIG, then built-in defaults)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Service base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Timing preset for settlement waits and transfer cadence
    #[arg(long, value_enum)]
    pub profile: Option<TimingProfile>,

    /// Stop after this many accepted transfers
    #[arg(long)]
    pub max_transfers: Option<u64>,

    /// Pre-shared secret sent with every call
    #[arg(long)]
    pub psk: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply(&self, mut cfg: HarnessConfig) -> HarnessConfig {
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        if let Some(profile) = self.profile {
            cfg.profile = profile;
        }
        if let Some(max) = self.max_transfers {
            cfg.max_transfers = Some(max);
        }
        if let Some(psk) = &self.psk {
            cfg.psk = psk.clone();
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_keeps_config() {
        let cli = Cli::try_parse_from(["rollup-smoke"]).unwrap();
        let cfg = cli.apply(HarnessConfig::default());
        assert_eq!(cfg, HarnessConfig::default());
    }

    #[test]
    fn test_overrides_win() {
        let cli = Cli::try_parse_from([
            "rollup-smoke",
            "--base-url",
            "http://10.0.0.2:8001",
            "--profile",
            "steady",
            "--max-transfers",
            "5",
            "--psk",
            "ff",
        ])
        .unwrap();
        let cfg = cli.apply(HarnessConfig::default());
        assert_eq!(cfg.base_url, "http://10.0.0.2:8001");
        assert_eq!(cfg.profile, TimingProfile::Steady);
        assert_eq!(cfg.max_transfers, Some(5));
        assert_eq!(cfg.psk, "ff");
    }

    #[test]
    fn test_unknown_profile_rejected() {
        let res = Cli::try_parse_from(["rollup-smoke", "--profile", "turbo"]);
        assert!(res.is_err());
    }
}
