//! Startup preparation of the store directories.
//! Makes paths absolute, creates missing directories (0700), and checks the
//! backups directory is writable. Every failure is a Config error.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{Result, UndoError};
use crate::platform::set_dir_mode_0700;
use crate::utils::{absolute_path, is_writable_probe};

use super::types::Config;

impl Config {
    /// Prepare the store for use. Idempotent.
    pub fn validate_and_prepare(&mut self) -> Result<()> {
        self.app_path = make_absolute(&self.app_path, "app_path")?;
        self.backups_path = make_absolute(&self.backups_path, "backups_path")?;
        self.ledger_path = make_absolute(&self.ledger_path, "ledger_path")?;
        if let Some(log) = self.log_file.take() {
            self.log_file = Some(make_absolute(&log, "log_file")?);
        }

        ensure_dir_is_or_create(&self.app_path, "app_path")?;
        ensure_dir_is_or_create(&self.backups_path, "backups_path")?;
        ensure_writable(&self.backups_path, "backups_path")?;

        if let Some(parent) = self.ledger_path.parent() {
            ensure_dir_is_or_create(parent, "ledger directory")?;
        }
        if self.ledger_path.is_dir() {
            return Err(UndoError::Config(format!(
                "ledger_path is a directory: {}",
                self.ledger_path.display()
            )));
        }
        if self.ledger_path.starts_with(&self.backups_path) {
            return Err(UndoError::Config(format!(
                "ledger_path '{}' must not be inside backups_path '{}'",
                self.ledger_path.display(),
                self.backups_path.display()
            )));
        }

        info!(
            app = %self.app_path.display(),
            backups = %self.backups_path.display(),
            ledger = %self.ledger_path.display(),
            "Config prepared"
        );
        Ok(())
    }
}

fn make_absolute(path: &Path, name: &str) -> Result<PathBuf> {
    absolute_path(path).map_err(|e| UndoError::Config(format!("cannot resolve {name} '{}': {e}", path.display())))
}

/// Ensure directory exists (create if missing, 0700). If it exists, it must be a directory.
fn ensure_dir_is_or_create(path: &Path, name: &str) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(UndoError::Config(format!(
                "{name} exists but isn't a directory: {}",
                path.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(path)
        .map_err(|e| UndoError::Config(format!("failed to create {name} directory '{}': {e}", path.display())))?;
    let _ = set_dir_mode_0700(path);
    info!("Created {name} directory: {}", path.display());
    Ok(())
}

/// Ensure directory is writable using a non-destructive probe file.
fn ensure_writable(path: &Path, name: &str) -> Result<()> {
    is_writable_probe(path).map_err(|e| {
        UndoError::Config(format!("cannot write to {name} '{}'; check permissions: {e}", path.display()))
    })?;
    debug!("{name} writable: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_directories() {
        let td = tempdir().unwrap();
        let mut cfg = Config::for_store(td.path().join("app"));
        cfg.validate_and_prepare().unwrap();
        assert!(cfg.app_path.is_dir());
        assert!(cfg.backups_path.is_dir());
        assert!(!cfg.ledger_path.exists(), "the ledger file is created on open, not here");
    }

    #[cfg(unix)]
    #[test]
    fn created_directories_are_private() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let mut cfg = Config::for_store(td.path().join("app"));
        cfg.validate_and_prepare().unwrap();
        let mode = fs::metadata(&cfg.backups_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
    }

    #[test]
    fn backups_path_as_file_is_config_error() {
        let td = tempdir().unwrap();
        let mut cfg = Config::for_store(td.path());
        fs::write(&cfg.backups_path, b"not a dir").unwrap();
        let err = cfg.validate_and_prepare().unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn ledger_inside_backups_is_rejected() {
        let td = tempdir().unwrap();
        let mut cfg = Config::for_store(td.path());
        cfg.ledger_path = cfg.backups_path.join("ledger.db");
        assert!(matches!(cfg.validate_and_prepare(), Err(UndoError::Config(_))));
    }

    #[test]
    fn relative_log_file_becomes_absolute() {
        let td = tempdir().unwrap();
        let mut cfg = Config::for_store(td.path());
        cfg.log_file = Some(PathBuf::from("x.log"));
        cfg.validate_and_prepare().unwrap();
        let log = cfg.log_file.unwrap();
        assert!(log.is_absolute());
        assert!(log.ends_with("x.log"));
    }
}
