use anyhow::{Context, bail};
use clap::Parser;
use tokio_tungstenite::tungstenite::http::Uri;

/// Runtime configuration for the `idshift-probe` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idshift-probe",
    version,
    about = "Sends one WebSocket frame to the chat server and waits for one back"
)]
pub struct CliArgs {
    /// WebSocket endpoint to connect to (`ws://` or `wss://`).
    ///
    /// Environment variable: `PROBE_URL`
    #[arg(long, env = "PROBE_URL", default_value_t = String::from("wss://localhost:2345"))]
    pub url: String,

    /// Text payload sent once the connection is open.
    ///
    /// Environment variable: `PROBE_MESSAGE`
    #[arg(long, env = "PROBE_MESSAGE", default_value_t = String::from("Hello world!"))]
    pub message: String,

    /// Verify the server certificate and hostname.
    ///
    /// Environment variable: `PROBE_VERIFY_CERTS`
    #[arg(long, env = "PROBE_VERIFY_CERTS", default_value_t = false)]
    pub verify_certs: bool,
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub url: Uri,
    pub message: String,
    pub verify_certs: bool,
}

impl TryFrom<CliArgs> for ProbeConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let url = args
            .url
            .parse::<Uri>()
            .with_context(|| format!("PROBE_URL ({}) is not a valid URL", args.url))?;

        match url.scheme_str() {
            Some("ws" | "wss") => {}
            Some(other) => bail!("PROBE_URL scheme must be ws or wss, got {other}"),
            None => bail!("PROBE_URL ({}) has no scheme", args.url),
        }

        if url.host().is_none() {
            bail!("PROBE_URL ({}) has no host", args.url);
        }

        Ok(Self {
            url,
            message: args.message,
            verify_certs: args.verify_certs,
        })
    }
}
