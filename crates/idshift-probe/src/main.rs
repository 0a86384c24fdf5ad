#![doc = include_str!("../README.md")]

mod config;
mod probe;
mod telemetry;

use clap::Parser;
use config::{CliArgs, ProbeConfig};
use telemetry::init_telemetry;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ProbeConfig::try_from(args)?;
    init_telemetry()?;

    probe::probe(&config).await?;
    Ok(())
}
