use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, warn};
use walkdir::{DirEntry, WalkDir};

/// Staging files younger than this may belong to a write still in progress.
pub(crate) const STALE_AFTER: Duration = Duration::from_secs(300);

/// Outcome of an orphaned staging file sweep.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct PurgeReport {
    pub removed: usize,
    pub failed: usize,
}

pub(crate) async fn purge_orphans(root: &Path, suffix: String, threshold: Duration) -> PurgeReport {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, &suffix, now, threshold)).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Staging file cleanup task panicked");
            PurgeReport::default()
        },
    }
}

fn remove_stale(root: &Path, suffix: &str, now: SystemTime, threshold: Duration) -> PurgeReport {
    let mut report = PurgeReport::default();

    WalkDir::new(root)
        .into_iter()
        .flatten()
        .filter(|e| is_staging(e, suffix) && is_stale(e, now, threshold))
        .for_each(|entry| match std::fs::remove_file(entry.path()) {
            Ok(()) => report.removed += 1,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Failed to remove staging file");
                report.failed += 1;
            },
        });

    report
}

fn is_staging(entry: &DirEntry, suffix: &str) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.ends_with(suffix))
}

fn is_stale(entry: &DirEntry, now: SystemTime, threshold: Duration) -> bool {
    older_than(entry.metadata().ok().and_then(|m| m.modified().ok()), now, threshold)
}

/// Files with an unknown or future mtime may still be in use and are kept.
fn older_than(modified: Option<SystemTime>, now: SystemTime, threshold: Duration) -> bool {
    modified
        .and_then(|modified| now.duration_since(modified).ok())
        .is_some_and(|age| age > threshold)
}
