#![cfg(unix)]

use rmundo::platform::{open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use tempfile::tempdir;

fn mode(p: &std::path::Path) -> u32 {
    fs::metadata(p).expect("meta").permissions().mode() & 0o777
}

#[test]
fn unix_set_dir_and_file_modes() {
    let td = tempdir().expect("tempdir");
    let dir = td.path().join("subdir");
    fs::create_dir_all(&dir).expect("create dir");
    set_dir_mode_0700(&dir).expect("set_dir_mode_0700");
    assert_eq!(mode(&dir), 0o700);

    let fpath = dir.join("f.txt");
    fs::write(&fpath, "hello").expect("write");
    set_file_mode_0600(&fpath).expect("set_file_mode_0600");
    assert_eq!(mode(&fpath), 0o600);
}

#[test]
fn new_log_and_config_files_are_private() {
    let td = tempdir().expect("tempdir");

    let log = td.path().join("rmundo.log");
    let mut f = open_log_file_secure_append(&log).expect("open log");
    writeln!(f, "line").expect("write");
    assert_eq!(mode(&log), 0o600);

    let cfg = td.path().join("config.xml");
    write_config_secure_new_0600(&cfg, b"<config/>").expect("write config");
    assert_eq!(mode(&cfg), 0o600);
    assert_eq!(fs::read_to_string(&cfg).unwrap(), "<config/>");
}
