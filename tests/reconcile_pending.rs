//! `check` classification and recovery of an interrupted restore.

use std::fs;
use tempfile::tempdir;

use rmundo::{BackupStatus, Config, Finding, Ledger, backup_entry, reconcile, restore};

#[test]
fn findings_cover_all_states() {
    let td = tempdir().unwrap();
    let mut cfg = Config::for_store(td.path().join("store"));
    cfg.validate_and_prepare().unwrap();
    let ledger = Ledger::open(&cfg.ledger_path).unwrap();

    let mut recs = Vec::new();
    for name in ["intact.txt", "pending.txt", "gone.txt", "done.txt"] {
        let p = td.path().join(name);
        fs::write(&p, name).unwrap();
        recs.push(backup_entry(&cfg, &ledger, &p).unwrap());
    }
    // pending: moved back by hand, container left behind
    fs::rename(&recs[1].destination_path, &recs[1].source_path).unwrap();
    // gone: data lost entirely
    fs::remove_dir_all(&recs[2].container_path).unwrap();
    // done: properly restored, so not inspected
    restore(&cfg, &ledger, recs[3].id).unwrap();

    let findings = reconcile(&ledger).unwrap();
    let got: Vec<(i64, Finding)> = findings.iter().map(|(r, f)| (r.id, *f)).collect();
    assert_eq!(
        got,
        vec![
            (recs[0].id, Finding::Intact),
            (recs[1].id, Finding::PendingCleanup),
            (recs[2].id, Finding::Missing),
        ]
    );
}

#[test]
fn restore_finishes_pending_cleanup() {
    let td = tempdir().unwrap();
    let mut cfg = Config::for_store(td.path().join("store"));
    cfg.validate_and_prepare().unwrap();
    let ledger = Ledger::open(&cfg.ledger_path).unwrap();

    let f = td.path().join("half.txt");
    fs::write(&f, "half").unwrap();
    let rec = backup_entry(&cfg, &ledger, &f).unwrap();
    fs::rename(&rec.destination_path, &f).unwrap();

    restore(&cfg, &ledger, rec.id).unwrap();
    assert_eq!(fs::read_to_string(&f).unwrap(), "half");
    assert!(!rec.container_path.exists());
    assert_eq!(ledger.get_by_id(rec.id).unwrap().status, BackupStatus::Restored);
    assert!(reconcile(&ledger).unwrap().is_empty());
}
