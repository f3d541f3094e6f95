//! Sequential batch execution with stop-on-first-failure.
//!
//! Items run strictly in order. The first failure (or a shutdown request
//! between items) ends the batch; everything after it is reported as skipped.

use tracing::warn;

use crate::errors::UndoError;
use crate::shutdown;

/// Outcome of a batch: what finished, what failed, what never ran.
#[derive(Debug)]
pub struct BatchReport<K, T> {
    pub completed: Vec<(K, T)>,
    pub failure: Option<(K, UndoError)>,
    pub skipped: Vec<K>,
}

impl<K, T> BatchReport<K, T> {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Run `op` over `items` in order, honoring the process shutdown flag.
pub fn run_batch<K, T, F>(items: Vec<K>, op: F) -> BatchReport<K, T>
where
    F: FnMut(&K) -> Result<T, UndoError>,
{
    run_batch_with(items, shutdown::is_requested, op)
}

pub(crate) fn run_batch_with<K, T, C, F>(items: Vec<K>, is_cancelled: C, mut op: F) -> BatchReport<K, T>
where
    C: Fn() -> bool,
    F: FnMut(&K) -> Result<T, UndoError>,
{
    let mut report = BatchReport {
        completed: Vec::with_capacity(items.len()),
        failure: None,
        skipped: Vec::new(),
    };

    let mut iter = items.into_iter();
    while let Some(item) = iter.next() {
        if is_cancelled() {
            warn!("shutdown requested; stopping batch");
            report.failure = Some((item, UndoError::Interrupted));
            report.skipped.extend(iter);
            break;
        }
        match op(&item) {
            Ok(value) => report.completed.push((item, value)),
            Err(e) => {
                report.failure = Some((item, e));
                report.skipped.extend(iter);
                break;
            }
        }
    }

    report
}
