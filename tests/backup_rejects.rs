//! Targets refused before any container is allocated.

use assert_fs::prelude::*;
use std::fs;
use std::path::Path;

use rmundo::{Config, Ledger, backup_batch, backup_entry};

fn store(temp: &assert_fs::TempDir) -> (Config, Ledger) {
    let mut cfg = Config::for_store(temp.path().join("store"));
    cfg.validate_and_prepare().unwrap();
    let ledger = Ledger::open(&cfg.ledger_path).unwrap();
    (cfg, ledger)
}

fn container_count(cfg: &Config) -> usize {
    fs::read_dir(&cfg.backups_path).unwrap().count()
}

#[test]
fn dash_prefixed_target_is_rejected() {
    let temp = assert_fs::TempDir::new().unwrap();
    let (cfg, ledger) = store(&temp);

    for t in ["-rf", "--force", "-"] {
        let err = backup_entry(&cfg, &ledger, Path::new(t)).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument", "target {t}");
        assert!(err.to_string().contains("unrecognized option"), "msg: {err}");
    }
    assert_eq!(container_count(&cfg), 0);
    assert!(ledger.list_all().unwrap().is_empty());
}

#[test]
fn dash_prefixed_batch_stops_before_later_items() {
    let temp = assert_fs::TempDir::new().unwrap();
    let (cfg, ledger) = store(&temp);
    let keep = temp.child("keep.txt");
    keep.write_str("k").unwrap();

    let report = backup_batch(&cfg, &ledger, vec!["-rf".into(), keep.path().as_os_str().to_os_string()]);
    assert!(report.completed.is_empty());
    assert!(report.failure.is_some());
    assert_eq!(report.skipped.len(), 1);
    assert!(keep.path().exists());
}

#[cfg(unix)]
#[test]
fn symlink_target_is_rejected() {
    let temp = assert_fs::TempDir::new().unwrap();
    let (cfg, ledger) = store(&temp);
    let real = temp.child("real.txt");
    real.write_str("r").unwrap();
    let link = temp.child("link.txt");
    std::os::unix::fs::symlink(real.path(), link.path()).unwrap();

    let err = backup_entry(&cfg, &ledger, link.path()).unwrap_err();
    assert_eq!(err.kind(), "invalid_argument");
    assert!(fs::symlink_metadata(link.path()).unwrap().file_type().is_symlink());
    assert!(real.path().exists());
    assert_eq!(container_count(&cfg), 0);
}

#[test]
fn store_paths_are_protected() {
    let temp = assert_fs::TempDir::new().unwrap();
    let (cfg, ledger) = store(&temp);

    for target in [cfg.app_path.clone(), cfg.ledger_path.clone(), temp.path().to_path_buf()] {
        let err = backup_entry(&cfg, &ledger, &target).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument", "target {}", target.display());
    }
    assert!(cfg.ledger_path.exists());
    assert_eq!(container_count(&cfg), 0);
}
