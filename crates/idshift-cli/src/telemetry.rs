//! # Logging
//!
//! Conversion traces are `tracing` events emitted by the `idshift` library
//! (one per rewritten value, one span per pass). They are printed to stderr
//! through `tracing_subscriber::fmt`.
//!
//! The filter defaults to `info`, which shows every conversion and the final
//! summary. Set `RUST_LOG=warn` to keep only errors and the restore hint
//! printed after a failed phased run (the summary is an `info` event too):
//!
//! ```bash
//! RUST_LOG=warn idshift --database aster.db
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .compact(),
        )
        .try_init()?;
    Ok(())
}
