//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Creates a commented template at the default location if missing.
//!
//! Unknown XML fields are a hard error so typos surface instead of being ignored.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::paths::{config_path_from_env, default_app_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::{APP_DIR_NAME, CONFIG_ENV, CONFIG_FILE_NAME};

use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    app_path: Option<String>,
    backups_path: Option<String>,
    ledger_path: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    preserve_metadata: Option<bool>,
}

// Accept " true " as well as "true"; anything unparsable counts as unset.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<bool>().ok()))
}

fn non_empty_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim).filter(|t| !t.is_empty()).map(PathBuf::from)
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from an existing file.
    File(PathBuf),
    /// The default file was missing; a template was written and defaults used.
    CreatedTemplate(PathBuf),
    /// No file was read (no home directory, or the template could not be written).
    Defaults,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

// Map XmlConfig -> Config. Store paths not given follow app_path.
fn xml_to_config(parsed: XmlConfig, fallback_app: PathBuf) -> Config {
    let app_path = non_empty_path(parsed.app_path.as_deref()).unwrap_or(fallback_app);
    let mut cfg = Config::for_store(app_path);

    if let Some(p) = non_empty_path(parsed.backups_path.as_deref()) {
        cfg.backups_path = p;
    }
    if let Some(p) = non_empty_path(parsed.ledger_path.as_deref()) {
        cfg.ledger_path = p;
    }
    if let Some(p) = non_empty_path(parsed.log_file.as_deref()) {
        cfg.log_file = Some(p);
    }
    if let Some(s) = parsed.log_level.as_deref() {
        match s.trim().parse::<LogLevel>() {
            Ok(level) => cfg.log_level = level,
            Err(e) => warn!("ignoring log_level in config: {e}"),
        }
    }
    cfg.preserve_metadata = parsed.preserve_metadata.unwrap_or(false);
    cfg
}

fn fallback_app_path() -> PathBuf {
    default_app_path().unwrap_or_else(|| PathBuf::from(APP_DIR_NAME))
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig =
        from_xml_str(&contents).with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(xml_to_config(parsed, fallback_app_path()))
}

/// Resolve and load the configuration file.
///
/// - `$RMUNDO_CONFIG` set: that file must exist and parse.
/// - Otherwise `<app_path>/config.xml` (app_path from `app_override` or `~/.rmundo`):
///   loaded if present, else a template is written there and defaults are used.
pub fn load_or_init(app_override: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = config_path_from_env() {
        if !path.exists() {
            bail!("config file named by {CONFIG_ENV} does not exist: {}", path.display());
        }
        debug!(config = %path.display(), "loading config from {CONFIG_ENV}");
        let config = load_config_from_xml_path(&path)?;
        return Ok(LoadedConfig { config, source: ConfigSource::File(path) });
    }

    let app = match app_override.map(Path::to_path_buf).or_else(default_app_path) {
        Some(a) => a,
        None => {
            warn!("no home directory found; using built-in defaults");
            return Ok(LoadedConfig { config: Config::for_store(APP_DIR_NAME), source: ConfigSource::Defaults });
        }
    };
    let path = app.join(CONFIG_FILE_NAME);

    if path.exists() {
        debug!(config = %path.display(), "loading config");
        let config = load_config_from_xml_path(&path)?;
        return Ok(LoadedConfig { config, source: ConfigSource::File(path) });
    }

    let config = Config::for_store(&app);
    match create_template_config(&path, &config) {
        Ok(()) => Ok(LoadedConfig { config, source: ConfigSource::CreatedTemplate(path) }),
        Err(e) => {
            warn!(config = %path.display(), error = %e, "could not write template config; using defaults");
            Ok(LoadedConfig { config, source: ConfigSource::Defaults })
        }
    }
}

/// Render the template for `defaults`; every field commented with its meaning.
pub fn template_contents(defaults: &Config) -> String {
    let log_file = defaults
        .log_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    format!(
        "<!--\n  rmundo configuration (XML)\n\n    app_path           -> application directory; other paths default beneath it\n    backups_path       -> directory holding one container per backup\n    ledger_path        -> SQLite file recording every backup\n    log_level          -> quiet | normal | info | debug\n    log_file           -> path to log file (optional; console output is unaffected)\n    preserve_metadata  -> true/false; keep permissions and timestamps when a move has to copy\n\n  CLI flags override values in this file.\n-->\n<config>\n  <app_path>{}</app_path>\n  <backups_path>{}</backups_path>\n  <ledger_path>{}</ledger_path>\n  <log_level>{}</log_level>\n  <log_file>{}</log_file>\n  <preserve_metadata>{}</preserve_metadata>\n</config>\n",
        defaults.app_path.display(),
        defaults.backups_path.display(),
        defaults.ledger_path.display(),
        defaults.log_level,
        log_file,
        defaults.preserve_metadata,
    )
}

/// Write the template config (0600, parent 0700). Refuses symlinked ancestors.
pub fn create_template_config(path: &Path, defaults: &Config) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!("Refusing to create config: ancestor of {} is a symlink", path.display());
    }

    if let Some(parent) = path.parent() {
        let existed = parent.exists();
        fs::create_dir_all(parent).with_context(|| format!("create config directory '{}'", parent.display()))?;
        if !existed {
            let _ = set_dir_mode_0700(parent);
        }
    }

    write_config_secure_new_0600(path, template_contents(defaults).as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}
