//! CLI definition and parsing.
//!
//! Notes:
//! - Store and logging flags are global, so they work before or after the subcommand.
//! - --debug is a shorthand for --log-level debug.
//! - Paths starting with '-' must follow `--`; the backup step then rejects them.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueHint};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Reversible rm: moves files into a backup store and restores them on demand.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "A reversible rm: back up instead of deleting, restore by id")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Override the application directory (backups and ledger default beneath it).
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub app_path: Option<PathBuf>,

    /// Override the directory that holds backup containers.
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub backups_path: Option<PathBuf>,

    /// Override the ledger database file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub ledger_path: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Set log level: quiet, normal, info, debug.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    /// Keep permissions and timestamps when a move has to fall back to copying.
    #[arg(long, global = true)]
    pub preserve_metadata: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move files or directories into the backup store.
    Rm {
        #[arg(required = true, value_name = "PATH", value_hint = ValueHint::AnyPath)]
        paths: Vec<OsString>,
    },
    /// Restore backups by id, e.g. `restore 3` or `restore 1,2,5`.
    Restore {
        #[arg(value_name = "IDS")]
        ids: Option<String>,
    },
    /// List every backup, oldest first.
    List {
        /// Print records as JSON objects.
        #[arg(long)]
        json: bool,
    },
    /// Compare pending backups with the filesystem (read-only).
    Check,
    /// Show the config file location and effective settings.
    Config,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config value).
    pub fn effective_log_level(&self) -> Result<Option<LogLevel>> {
        if self.debug {
            return Ok(Some(LogLevel::Debug));
        }
        match self.log_level.as_deref() {
            None => Ok(None),
            Some(s) => match LogLevel::parse(s) {
                Some(l) => Ok(Some(l)),
                None => bail!("invalid --log-level '{s}' (expected quiet, normal, info or debug)"),
            },
        }
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<()> {
        if let Some(app) = &self.app_path {
            cfg.rebase(app);
        }
        if let Some(b) = &self.backups_path {
            cfg.backups_path = b.clone();
        }
        if let Some(l) = &self.ledger_path {
            cfg.ledger_path = l.clone();
        }
        if let Some(level) = self.effective_log_level()? {
            cfg.log_level = level;
        }
        if self.preserve_metadata {
            cfg.preserve_metadata = true;
        }
        Ok(())
    }
}

pub fn parse() -> Args {
    Args::parse()
}
