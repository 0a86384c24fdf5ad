#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, MigrateConfig};
use idshift::{CommitMode, MigrationReport, Migrator};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = MigrateConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let migrator = Migrator::new(&config.database, &config.backup).with_mode(config.mode);
    let result = if config.dry_run {
        migrator.preview()
    } else {
        migrator.run()
    };

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            // Only a failed pass after an earlier commit can leave the store
            // half converted.
            if !config.dry_run
                && config.mode == CommitMode::Phased
                && matches!(err, idshift::Error::Sqlite(_))
            {
                tracing::error!(
                    "store may be partially converted; restore {} over {} and re-run from scratch",
                    config.backup.display(),
                    config.database.display()
                );
            }
            return Err(err)
                .with_context(|| format!("failed to convert {}", config.database.display()));
        }
    };

    log_summary(&report);
    Ok(())
}

fn log_startup_info(config: &MigrateConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting identifier conversion with full config: {config:#?}");
    } else {
        tracing::info!(
            database = %config.database.display(),
            backup = %config.backup.display(),
            atomic = config.mode == CommitMode::Atomic,
            dry_run = config.dry_run,
            "Starting identifier conversion"
        );
    }
}

fn log_summary(report: &MigrationReport) {
    let verb = if report.dry_run {
        "would convert"
    } else {
        "converted"
    };

    if report.is_noop() {
        tracing::info!("No identifiers exceed the safe range; nothing to convert");
        return;
    }

    for pass in &report.passes {
        tracing::info!(
            pass = %pass.name,
            values = pass.conversions.len(),
            rows = pass.rows(),
            "pass summary"
        );
    }
    tracing::info!(
        "Done: {verb} {} identifier values across {} rows",
        report.values(),
        report.rows()
    );
}
