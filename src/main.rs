// src/main.rs
//! Rollup smoke-test entry point.
//! Runs the scripted scenario against the configured service until a step
//! fails, the transfer limit is reached, or CTRL+c is pressed.
use anyhow::Result;
use clap::Parser;
use rollup_smoke::cli::Cli;
use rollup_smoke::core::config::HarnessConfig;
use rollup_smoke::harness::SmokeRunner;
use rollup_smoke::security::redact_secret;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    info!("Starting rollup-smoke v{}", env!("CARGO_PKG_VERSION"));

    let loaded = HarnessConfig::load(cli.config.as_deref())?;
    let config = cli.apply(loaded).validated()?;
    info!(
        base_url = %config.base_url,
        profile = ?config.profile,
        max_transfers = ?config.max_transfers,
        psk = %redact_secret(&config.psk),
        "Target service"
    );

    let cancel = CancellationToken::new();
    spawn_interrupt_watcher(cancel.clone());

    let mut runner = SmokeRunner::new(config, std::io::stdout(), cancel)?;
    match runner.run().await {
        Ok(summary) => {
            println!("{}", summary);
            Ok(())
        }
        Err(e) if e.is_step_failure() => {
            // The scripted failure line is already on stdout.
            error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// First CTRL+c cancels the run; a second one exits immediately with 130.
fn spawn_interrupt_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for CTRL+c: {}", e);
                return;
            }
            if cancel.is_cancelled() {
                warn!("Second interrupt, exiting now");
                std::process::exit(130);
            }
            warn!("Interrupt received, stopping the run");
            cancel.cancel();
        }
    });
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
