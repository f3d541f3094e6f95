//! End-to-end runs of the binary against a store inside a temp dir.

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

struct Store {
    _td: tempfile::TempDir,
    base: PathBuf,
    cfg_path: PathBuf,
}

fn store() -> Store {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let cfg_path = base.join("config.xml");
    let xml = format!(
        r#"<config>
  <app_path>{}</app_path>
  <log_level>quiet</log_level>
  <preserve_metadata>false</preserve_metadata>
</config>"#,
        base.join("app").display()
    );
    fs::write(&cfg_path, xml).unwrap();
    Store { _td: td, base, cfg_path }
}

fn rmundo(s: &Store) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("rmundo"));
    cmd.env("RMUNDO_CONFIG", &s.cfg_path).current_dir(&s.base);
    cmd
}

fn write(p: &Path, contents: &str) {
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, contents).unwrap();
}

#[test]
fn rm_list_restore_check() {
    let s = store();
    let notes = s.base.join("work/notes.txt");
    write(&notes, "hello");

    rmundo(&s)
        .args(["rm"])
        .arg(&notes)
        .assert()
        .success()
        .stdout(predicate::str::contains("with id 1"));
    assert!(!notes.exists());

    let out = rmundo(&s).args(["list", "--json"]).output().unwrap();
    assert!(out.status.success());
    let records: Vec<serde_json::Value> = serde_json::Deserializer::from_slice(&out.stdout)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[0]["status"], "BACKED_UP");
    assert_eq!(records[0]["sourcePath"], notes.display().to_string());

    rmundo(&s)
        .args(["check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INTACT"));

    rmundo(&s)
        .args(["restore", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("restored backup with id 1 to"));
    assert_eq!(fs::read_to_string(&notes).unwrap(), "hello");

    rmundo(&s)
        .args(["restore", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RESTORED"));

    rmundo(&s)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RESTORED"));
}

#[test]
fn empty_list_message() {
    let s = store();
    rmundo(&s)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("there are no backups to list"));
}

#[test]
fn option_like_target_fails_without_side_effects() {
    let s = store();
    rmundo(&s)
        .args(["rm", "--", "-rf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized option"));

    let backups = s.base.join("app/backups");
    assert_eq!(fs::read_dir(&backups).unwrap().count(), 0);
}

#[test]
fn restore_without_ids_fails() {
    let s = store();
    rmundo(&s)
        .args(["restore"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("please specify backup ids to restore"));
}

#[test]
fn config_command_reports_effective_paths() {
    let s = store();
    rmundo(&s)
        .args(["config", "--backups-path"])
        .arg(s.base.join("other"))
        .assert()
        .success()
        .stdout(predicate::str::contains(s.cfg_path.display().to_string()))
        .stdout(predicate::str::contains(format!("backups_path: {}", s.base.join("other").display())))
        .stdout(predicate::str::contains("log_level: quiet"));
    assert!(!s.base.join("other").exists(), "config does not prepare the store");
}

#[test]
fn missing_env_config_is_an_error() {
    let td = tempdir().unwrap();
    Command::new(cargo::cargo_bin!("rmundo"))
        .env("RMUNDO_CONFIG", td.path().join("absent.xml"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("RMUNDO_CONFIG"));
}
