//! Config module.
//! Provides configuration types, default paths, XML loading, and startup preparation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{config_path_from_env, default_app_path, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{ConfigSource, LoadedConfig, create_template_config, load_config_from_xml_path, load_or_init};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RMUNDO_CONFIG";

pub const APP_DIR_NAME: &str = ".rmundo";
pub const CONFIG_FILE_NAME: &str = "config.xml";
pub const BACKUPS_DIR_NAME: &str = "backups";
pub const LEDGER_FILE_NAME: &str = "backups.db";
pub const LOG_FILE_NAME: &str = "rmundo.log";
