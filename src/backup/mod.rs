pub mod dispatcher;
pub mod manifest;
pub mod mirror;
pub mod task_processor;

pub use dispatcher::BackupDispatcher;
pub use manifest::{read_manifest, ManifestEntry};
pub use mirror::Mirror;
pub use task_processor::TaskProcessor;

use serde::Serialize;
use std::ops::AddAssign;
use std::path::PathBuf;
use std::time::Duration;

/// One unit of top-level work: mirror `source` into `destination`.
#[derive(Debug, Clone)]
pub struct BackupTask {
    pub line: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl BackupTask {
    pub fn new(entry: &ManifestEntry, destination: PathBuf) -> Self {
        Self {
            line: entry.line,
            source: entry.path.clone(),
            destination,
        }
    }
}

/// What a mirror did to one source subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MirrorStats {
    pub files_copied: u64,
    pub bytes_copied: u64,
    pub folders: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl AddAssign for MirrorStats {
    fn add_assign(&mut self, other: Self) {
        self.files_copied += other.files_copied;
        self.bytes_copied += other.bytes_copied;
        self.folders += other.folders;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Outcome of a whole dispatcher run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub tasks_launched: usize,
    pub signals_consumed: usize,
    /// Tasks that ended without firing their completion signal
    pub lost_tasks: usize,
    pub stats: MirrorStats,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accumulate() {
        let mut total = MirrorStats::default();
        total += MirrorStats { files_copied: 2, bytes_copied: 10, folders: 1, skipped: 0, failed: 1 };
        total += MirrorStats { files_copied: 1, bytes_copied: 5, folders: 0, skipped: 1, failed: 0 };
        assert_eq!(
            total,
            MirrorStats { files_copied: 3, bytes_copied: 15, folders: 1, skipped: 1, failed: 1 }
        );
    }
}
