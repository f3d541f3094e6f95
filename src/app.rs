//! Application orchestrator.
//! Loads/merges config, validates the store, initializes logging, installs signal
//! handlers, opens the ledger, and runs the requested command.

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use rmundo::cli::{Args, Command};
use rmundo::output as out;
use rmundo::{
    BatchReport, Config, ConfigSource, Finding, Ledger, UndoError, backup_batch, default_config_path, load_or_init,
    parse_ids, reconcile, restore_batch, shutdown,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    let loaded = load_or_init(args.app_path.as_deref())?;
    let mut cfg = loaded.config;
    args.apply_overrides(&mut cfg)?;

    // `config` only reports; it must work even when the store is unusable.
    if args.command == Command::Config {
        print_config(&loaded.source, &cfg, args.app_path.as_deref());
        return Ok(());
    }

    if let ConfigSource::CreatedTemplate(path) = &loaded.source {
        out::print_info(&format!("A template rmundo config was written to: {}", path.display()));
    }

    cfg.validate_and_prepare()?;

    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.log_json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current step and stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .map_err(|e| anyhow!("failed to install signal handler: {e}"))?;
    }

    debug!(command = ?args.command, backups = %cfg.backups_path.display(), "starting rmundo");

    let result = Ledger::open(&cfg.ledger_path)
        .with_context(|| format!("open ledger '{}'", cfg.ledger_path.display()))
        .and_then(|ledger| dispatch(&cfg, &ledger, args.command));

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn dispatch(cfg: &Config, ledger: &Ledger, command: Command) -> Result<()> {
    match command {
        Command::Rm { paths } => {
            let report = backup_batch(cfg, ledger, paths);
            for (_, rec) in &report.completed {
                out::print_user(&format!(
                    "backed up {} with id {}",
                    rec.source_path.display(),
                    rec.id
                ));
            }
            finish_batch(report, |p| Path::new(p).display().to_string())
        }
        Command::Restore { ids } => {
            let ids = parse_ids(ids.as_deref().unwrap_or("")).inspect_err(|e| log_failure(e, "restore"))?;
            let report = restore_batch(cfg, ledger, ids);
            for (id, rec) in &report.completed {
                out::print_user(&format!(
                    "restored backup with id {id} to {}",
                    rec.source_path.display()
                ));
            }
            finish_batch(report, |id| format!("backup {id}"))
        }
        Command::List { json } => {
            let records = ledger.list_all()?;
            if records.is_empty() {
                out::print_user("there are no backups to list");
                return Ok(());
            }
            for rec in &records {
                if json {
                    out::print_user(&serde_json::to_string_pretty(rec)?);
                } else {
                    out::print_record(rec);
                }
            }
            Ok(())
        }
        Command::Check => {
            let findings = reconcile(ledger)?;
            if findings.is_empty() {
                out::print_user("there are no pending backups to check");
                return Ok(());
            }
            for (rec, finding) in &findings {
                out::print_user(&format!("{:>4}  {:<15}  {}", rec.id, finding, rec.source_path.display()));
            }
            let pending = findings.iter().filter(|(_, f)| *f == Finding::PendingCleanup).count();
            let missing = findings.iter().filter(|(_, f)| *f == Finding::Missing).count();
            if pending > 0 {
                out::print_info(&format!("{pending} backup(s) already back in place; `restore` them to finish cleanup"));
            }
            if missing > 0 {
                out::print_warn(&format!("{missing} backup(s) have no data on disk"));
            }
            Ok(())
        }
        // Handled before the store is prepared.
        Command::Config => Ok(()),
    }
}

/// Turn a batch outcome into the process result, reporting what did not run.
fn finish_batch<K, T>(report: BatchReport<K, T>, describe: impl Fn(&K) -> String) -> Result<()> {
    let Some((item, err)) = report.failure else {
        return Ok(());
    };
    log_failure(&err, &describe(&item));
    if !report.skipped.is_empty() {
        let rest: Vec<String> = report.skipped.iter().map(&describe).collect();
        out::print_warn(&format!("not attempted: {}", rest.join(", ")));
    }
    Err(err.into())
}

fn log_failure(err: &UndoError, item: &str) {
    let code = err.code();
    let kind = err.kind();
    match err {
        UndoError::Io { path, .. } => {
            error!(code, kind, item, path = %path.display(), error = %err, "operation failed")
        }
        UndoError::InvalidState { id, expected, actual } => {
            error!(code, kind, id = *id, %expected, %actual, "operation failed")
        }
        UndoError::InsufficientSpace { required, available, dest } => {
            error!(code, kind, item, required = *required, available = *available, dest = %dest.display(), "operation failed")
        }
        UndoError::Interrupted => error!(code, kind, item, "operation aborted by user"),
        _ => error!(code, kind, item, error = %err, "operation failed"),
    }
}

fn print_config(source: &ConfigSource, cfg: &Config, app_override: Option<&Path>) {
    match source {
        ConfigSource::File(p) => out::print_user(&format!("config file: {}", p.display())),
        ConfigSource::CreatedTemplate(p) => {
            out::print_user(&format!("config file: {} (template just created)", p.display()))
        }
        ConfigSource::Defaults => match default_config_path(app_override) {
            Some(p) => out::print_user(&format!("config file: none at {} (built-in defaults)", p.display())),
            None => out::print_user("config file: none (built-in defaults)"),
        },
    }
    out::print_user(&format!("app_path: {}", cfg.app_path.display()));
    out::print_user(&format!("backups_path: {}", cfg.backups_path.display()));
    out::print_user(&format!("ledger_path: {}", cfg.ledger_path.display()));
    out::print_user(&format!("log_level: {}", cfg.log_level));
    out::print_user(&format!(
        "log_file: {}",
        cfg.log_file.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
    ));
    out::print_user(&format!("preserve_metadata: {}", cfg.preserve_metadata));
}
