//! Directory trees keep their structure, including empty subdirectories.

use assert_fs::prelude::*;
use std::fs;

use rmundo::{BackupStatus, Config, EntryKind, Ledger, backup_entry, restore};

#[test]
fn project_tree_round_trip() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mut cfg = Config::for_store(temp.path().join("store"));
    cfg.validate_and_prepare().unwrap();
    let ledger = Ledger::open(&cfg.ledger_path).unwrap();

    let proj = temp.child("proj");
    proj.child("src/main.txt").write_str("fn main() {}").unwrap();
    proj.child("README").write_str("readme").unwrap();
    proj.child("empty").create_dir_all().unwrap();

    let rec = backup_entry(&cfg, &ledger, proj.path()).unwrap();
    assert_eq!(rec.kind, EntryKind::Directory);
    assert!(!proj.path().exists());
    assert!(rec.destination_path.join("src/main.txt").is_file());
    assert!(rec.destination_path.join("empty").is_dir());

    restore(&cfg, &ledger, rec.id).unwrap();

    proj.child("src/main.txt").assert("fn main() {}");
    proj.child("README").assert("readme");
    assert!(proj.child("empty").path().is_dir());
    assert_eq!(fs::read_dir(proj.child("empty").path()).unwrap().count(), 0);
    assert!(!rec.container_path.exists());
    assert_eq!(ledger.get_by_id(rec.id).unwrap().status, BackupStatus::Restored);
}

#[test]
fn empty_directory_round_trip() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mut cfg = Config::for_store(temp.path().join("store"));
    cfg.validate_and_prepare().unwrap();
    let ledger = Ledger::open(&cfg.ledger_path).unwrap();

    let d = temp.child("hollow");
    d.create_dir_all().unwrap();

    let rec = backup_entry(&cfg, &ledger, d.path()).unwrap();
    assert_eq!(rec.kind, EntryKind::Directory);
    restore(&cfg, &ledger, rec.id).unwrap();
    assert!(d.path().is_dir());
}
