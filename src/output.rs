use owo_colors::OwoColorize;

use crate::ledger::{BackupRecord, BackupStatus};

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when the stream is a TTY.
///
/// Command results go to stdout; notes, warnings and errors go to stderr so
/// `list --json` output stays machine-readable.
fn is_tty(stream: atty::Stream) -> bool {
    atty::is(stream)
}

pub fn print_info(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "info:".cyan().bold(), msg);
    } else {
        eprintln!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

/// Print a plain user-facing line (no prefix). Use this for primary outputs
/// which users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// One `list` line: id, status, kind, creation time, then `source -> destination`.
pub fn record_line(rec: &BackupRecord) -> String {
    format!(
        "{:>4}  {:<9}  {:<9}  {}  {} -> {}",
        rec.id,
        rec.status,
        rec.kind,
        rec.created_at.format("%Y-%m-%d %H:%M:%S"),
        rec.source_path.display(),
        rec.destination_path.display()
    )
}

pub fn print_record(rec: &BackupRecord) {
    let line = record_line(rec);
    if is_tty(atty::Stream::Stdout) && rec.status == BackupStatus::Restored {
        println!("{}", line.dimmed());
    } else {
        println!("{}", line);
    }
}
