//! Default path helpers and symlink checks.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{APP_DIR_NAME, CONFIG_ENV, CONFIG_FILE_NAME};

/// `~/.rmundo`, or None when no home directory can be determined.
pub fn default_app_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DIR_NAME))
}

/// Config file named by `RMUNDO_CONFIG`, made absolute against the cwd.
pub fn config_path_from_env() -> Option<PathBuf> {
    let raw = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty())?;
    let p = PathBuf::from(raw);
    Some(std::path::absolute(&p).unwrap_or(p))
}

/// Where the config file is looked up: `$RMUNDO_CONFIG`, else `<app_path>/config.xml`.
/// `app_override` replaces the default app path (the `--app-path` flag).
pub fn default_config_path(app_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = config_path_from_env() {
        return Some(p);
    }
    match app_override {
        Some(app) => Some(app.join(CONFIG_FILE_NAME)),
        None => default_app_path().map(|a| a.join(CONFIG_FILE_NAME)),
    }
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.as_os_str().is_empty() {
            break;
        }
        match fs::symlink_metadata(anc) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        p = anc.parent();
    }
    Ok(false)
}
