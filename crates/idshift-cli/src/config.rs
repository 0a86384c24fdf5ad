use anyhow::bail;
use clap::Parser;
use idshift::{CommitMode, DEFAULT_BACKUP, DEFAULT_STORE};
use std::path::PathBuf;

/// Runtime configuration for the `idshift` binary.
///
/// Every value can come from a flag or an environment variable (a `.env`
/// file in the working directory is loaded first). The defaults reproduce the
/// one-shot conversion of `aster.db` next to the binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idshift",
    version,
    about = "Shrinks 63-bit identifiers in a SQLite store into the 53-bit safe range"
)]
pub struct CliArgs {
    /// Path of the SQLite store to convert in place.
    ///
    /// Environment variable: `IDSHIFT_DATABASE`
    #[arg(long, env = "IDSHIFT_DATABASE", default_value = DEFAULT_STORE)]
    pub database: PathBuf,

    /// Path the store is copied to before any write. An existing file is
    /// overwritten.
    ///
    /// Environment variable: `IDSHIFT_BACKUP`
    #[arg(long, env = "IDSHIFT_BACKUP", default_value = DEFAULT_BACKUP)]
    pub backup: PathBuf,

    /// Commit every pass in one transaction instead of once per pass.
    ///
    /// Environment variable: `IDSHIFT_ATOMIC`
    #[arg(long, env = "IDSHIFT_ATOMIC", default_value_t = false)]
    pub atomic: bool,

    /// Report what would be converted without backing up or writing.
    ///
    /// Environment variable: `IDSHIFT_DRY_RUN`
    #[arg(long, env = "IDSHIFT_DRY_RUN", default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct MigrateConfig {
    pub database: PathBuf,
    pub backup: PathBuf,
    pub mode: CommitMode,
    pub dry_run: bool,
}

impl TryFrom<CliArgs> for MigrateConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.database.as_os_str().is_empty() {
            bail!("IDSHIFT_DATABASE must not be empty");
        }

        if args.backup.as_os_str().is_empty() {
            bail!("IDSHIFT_BACKUP must not be empty");
        }

        if args.database == args.backup {
            bail!(
                "IDSHIFT_BACKUP ({}) must differ from IDSHIFT_DATABASE",
                args.backup.display()
            );
        }

        let mode = if args.atomic {
            CommitMode::Atomic
        } else {
            CommitMode::Phased
        };

        Ok(Self {
            database: args.database,
            backup: args.backup,
            mode,
            dry_run: args.dry_run,
        })
    }
}
