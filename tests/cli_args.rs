use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use rmundo::cli::{Args, Command};
use rmundo::{Config, LogLevel};

#[test]
fn rm_takes_many_paths() {
    let args = Args::try_parse_from(["rmundo", "rm", "a.txt", "dir", "b"]).unwrap();
    assert_eq!(
        args.command,
        Command::Rm {
            paths: vec![OsString::from("a.txt"), OsString::from("dir"), OsString::from("b")]
        }
    );
}

#[test]
fn rm_requires_a_path() {
    assert!(Args::try_parse_from(["rmundo", "rm"]).is_err());
}

#[test]
fn rm_dash_options_are_not_paths() {
    assert!(Args::try_parse_from(["rmundo", "rm", "-rf"]).is_err());
    // after `--` the value is passed through; the backup step rejects it
    let args = Args::try_parse_from(["rmundo", "rm", "--", "-rf"]).unwrap();
    assert_eq!(args.command, Command::Rm { paths: vec![OsString::from("-rf")] });
}

#[test]
fn restore_ids_are_optional_at_parse_time() {
    let args = Args::try_parse_from(["rmundo", "restore", "1,2"]).unwrap();
    assert_eq!(args.command, Command::Restore { ids: Some("1,2".into()) });
    let args = Args::try_parse_from(["rmundo", "restore"]).unwrap();
    assert_eq!(args.command, Command::Restore { ids: None });
}

#[test]
fn list_json_flag() {
    let args = Args::try_parse_from(["rmundo", "list", "--json"]).unwrap();
    assert_eq!(args.command, Command::List { json: true });
}

#[test]
fn global_flags_after_subcommand() {
    let args = Args::try_parse_from(["rmundo", "check", "--app-path", "/srv/undo", "-d", "--log-json"]).unwrap();
    assert_eq!(args.command, Command::Check);
    assert_eq!(args.app_path, Some(PathBuf::from("/srv/undo")));
    assert!(args.debug);
    assert!(args.log_json);
}

#[test]
fn debug_wins_over_log_level() {
    let args = Args::try_parse_from(["rmundo", "--log-level", "quiet", "-d", "list"]).unwrap();
    assert_eq!(args.effective_log_level().unwrap(), Some(LogLevel::Debug));
}

#[test]
fn log_level_flag_is_case_insensitive_and_overrides_config() {
    let args = Args::try_parse_from(["rmundo", "list", "--log-level", "INFO"]).unwrap();
    assert_eq!(args.effective_log_level().unwrap(), Some(LogLevel::Info));

    let mut cfg = Config::for_store("/a");
    cfg.log_level = LogLevel::Quiet;
    args.apply_overrides(&mut cfg).unwrap();
    assert_eq!(cfg.log_level, LogLevel::Info);
}

#[test]
fn no_log_flags_keep_config_level() {
    let args = Args::try_parse_from(["rmundo", "check"]).unwrap();
    assert_eq!(args.effective_log_level().unwrap(), None);

    let mut cfg = Config::for_store("/a");
    cfg.log_level = LogLevel::Quiet;
    args.apply_overrides(&mut cfg).unwrap();
    assert_eq!(cfg.log_level, LogLevel::Quiet);
}

#[test]
fn bad_log_level_is_an_error() {
    let args = Args::try_parse_from(["rmundo", "--log-level", "loud", "list"]).unwrap();
    assert!(args.effective_log_level().is_err());
    let mut cfg = Config::for_store("/a");
    assert!(args.apply_overrides(&mut cfg).is_err());
}

#[test]
fn app_path_override_rederives_store_paths() {
    let args = Args::try_parse_from([
        "rmundo",
        "--app-path",
        "/b",
        "--ledger-path",
        "/elsewhere/l.db",
        "--preserve-metadata",
        "list",
    ])
    .unwrap();
    let mut cfg = Config::for_store("/a");
    args.apply_overrides(&mut cfg).unwrap();

    assert_eq!(cfg.app_path, PathBuf::from("/b"));
    assert_eq!(cfg.backups_path, PathBuf::from("/b/backups"));
    assert_eq!(cfg.ledger_path, PathBuf::from("/elsewhere/l.db"));
    assert!(cfg.preserve_metadata);
    assert_eq!(cfg.log_level, LogLevel::Normal);
}
