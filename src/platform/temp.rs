//! Unique sibling names for atomic config writes.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Pattern: .rmundo.config.tmp.<pid>.<nanos>.<seq>
pub fn tmp_config_sibling_name(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = format!(".rmundo.config.tmp.{pid}.{nanos}.{seq}");
    target.parent().unwrap_or_else(|| Path::new(".")).join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn uniqueness_concurrent() {
        let handles: Vec<_> = (0..32)
            .map(|_| thread::spawn(|| tmp_config_sibling_name(Path::new("/cfg/config.xml"))))
            .collect();
        let mut set = HashSet::new();
        for h in handles {
            let p = h.join().unwrap();
            assert_eq!(p.parent().unwrap(), Path::new("/cfg"));
            assert!(set.insert(p));
        }
        assert_eq!(set.len(), 32);
    }
}
