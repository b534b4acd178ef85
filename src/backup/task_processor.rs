use super::{BackupTask, MirrorStats};

/// Executes one top-level backup task.
///
/// This is the seam between the dispatcher, which only knows about fan-out
/// and completion, and whatever actually moves bytes. Implementations run on
/// a blocking thread and must not panic on I/O failure: they report it and
/// return what they managed.
pub trait TaskProcessor: Send + Sync {
    fn process_task(&self, task: &BackupTask) -> MirrorStats;
}
