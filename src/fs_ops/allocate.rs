//! Backup container allocation.
//!
//! Container names are the decimal form of a nanosecond wall-clock reading.
//! A process-wide "last issued" value forces them strictly increasing, so two
//! calls within one clock tick (or on different threads) never collide.

use std::fs::DirBuilder;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::errors::Result;

use super::helpers::io_error_with_help;

static LAST_ISSUED: AtomicU64 = AtomicU64::new(0);

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Next container token: `max(now, last + 1)`.
pub(crate) fn next_container_id() -> String {
    let now = now_nanos();
    let prev = LAST_ISSUED
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    now.max(prev.saturating_add(1)).to_string()
}

/// Create a fresh container directory directly under `backups_path`.
///
/// The parent is not created; a missing `backups_path` or an existing
/// container of the same name is an error.
pub fn allocate_container(backups_path: &Path) -> Result<PathBuf> {
    let container = backups_path.join(next_container_id());

    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
        .create(&container)
        .map_err(io_error_with_help("create backup container", &container))?;

    debug!(container = %container.display(), "allocated backup container");
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn ids_are_unique_in_a_tight_loop() {
        let ids: Vec<String> = (0..1000).map(|_| next_container_id()).collect();
        let set: HashSet<_> = ids.iter().collect();
        assert_eq!(set.len(), ids.len());
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let a: u64 = next_container_id().parse().unwrap();
        let b: u64 = next_container_id().parse().unwrap();
        let c: u64 = next_container_id().parse().unwrap();
        assert!(a < b && b < c, "{a} {b} {c}");
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (0..200).map(|_| next_container_id()).collect::<Vec<_>>()))
            .collect();
        let mut set = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(set.insert(id), "duplicate container id");
            }
        }
        assert_eq!(set.len(), 8 * 200);
    }

    #[test]
    fn creates_directory_under_base() {
        let dir = tempdir().unwrap();
        let c = allocate_container(dir.path()).unwrap();
        assert!(c.is_dir());
        assert_eq!(c.parent().unwrap(), dir.path());
    }

    #[cfg(unix)]
    #[test]
    fn container_mode_is_0755() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let c = allocate_container(dir.path()).unwrap();
        let mode = std::fs::metadata(&c).unwrap().permissions().mode() & 0o777;
        // umask may only clear bits
        assert_eq!(mode & !0o755, 0);
        assert_ne!(mode & 0o700, 0);
    }

    #[test]
    fn missing_base_is_an_error() {
        let dir = tempdir().unwrap();
        let err = allocate_container(&dir.path().join("absent")).unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }
}
