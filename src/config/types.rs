//! Core configuration types.
//! - Config holds the store locations and runtime settings.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::paths;
use super::{APP_DIR_NAME, BACKUPS_DIR_NAME, LEDGER_FILE_NAME, LOG_FILE_NAME};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration: where the store lives and how to behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Application directory; other defaults hang off it
    pub app_path: PathBuf,
    /// Parent of every backup container
    pub backups_path: PathBuf,
    /// SQLite ledger file
    pub ledger_path: PathBuf,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// If true, a copy fallback keeps permissions and timestamps
    pub preserve_metadata: bool,
}

impl Default for Config {
    fn default() -> Self {
        let app = paths::default_app_path().unwrap_or_else(|| PathBuf::from(APP_DIR_NAME));
        Self::for_store(app)
    }
}

impl Config {
    /// Config whose store paths all derive from `app_path`; other fields use defaults.
    pub fn for_store(app_path: impl Into<PathBuf>) -> Self {
        let app_path = app_path.into();
        Self {
            backups_path: app_path.join(BACKUPS_DIR_NAME),
            ledger_path: app_path.join(LEDGER_FILE_NAME),
            log_file: Some(app_path.join(LOG_FILE_NAME)),
            app_path,
            log_level: LogLevel::Normal,
            preserve_metadata: false,
        }
    }

    /// Move the store to `app_path`. Paths that were derived from the old
    /// app path follow it; explicitly customised ones are kept.
    pub fn rebase(&mut self, app_path: &Path) {
        let old = std::mem::replace(&mut self.app_path, app_path.to_path_buf());
        if self.backups_path == old.join(BACKUPS_DIR_NAME) {
            self.backups_path = app_path.join(BACKUPS_DIR_NAME);
        }
        if self.ledger_path == old.join(LEDGER_FILE_NAME) {
            self.ledger_path = app_path.join(LEDGER_FILE_NAME);
        }
        if self.log_file.as_deref() == Some(old.join(LOG_FILE_NAME).as_path()) {
            self.log_file = Some(app_path.join(LOG_FILE_NAME));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_store_derives_paths() {
        let c = Config::for_store("/srv/undo");
        assert_eq!(c.backups_path, PathBuf::from("/srv/undo/backups"));
        assert_eq!(c.ledger_path, PathBuf::from("/srv/undo/backups.db"));
        assert_eq!(c.log_file, Some(PathBuf::from("/srv/undo/rmundo.log")));
        assert!(!c.preserve_metadata);
    }

    #[test]
    fn rebase_moves_derived_paths_only() {
        let mut c = Config::for_store("/a");
        c.ledger_path = PathBuf::from("/elsewhere/ledger.db");
        c.rebase(Path::new("/b"));
        assert_eq!(c.app_path, PathBuf::from("/b"));
        assert_eq!(c.backups_path, PathBuf::from("/b/backups"));
        assert_eq!(c.ledger_path, PathBuf::from("/elsewhere/ledger.db"));
        assert_eq!(c.log_file, Some(PathBuf::from("/b/rmundo.log")));
    }

    #[test]
    fn log_level_parse_aliases() {
        assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("none"), Some(LogLevel::Quiet));
        assert_eq!("verbose".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert!("loud".parse::<LogLevel>().is_err());
        assert!("".parse::<LogLevel>().is_err());
    }

    #[test]
    fn log_level_display_parses_back() {
        for lvl in [LogLevel::Quiet, LogLevel::Normal, LogLevel::Info, LogLevel::Debug] {
            assert_eq!(lvl.to_string().parse::<LogLevel>(), Ok(lvl));
        }
    }
}
