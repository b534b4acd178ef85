use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{oneshot, Semaphore};
use tracing::{debug, info, warn};

use super::manifest::{read_manifest, ManifestEntry};
use super::mirror::{create_folder, Mirror};
use super::task_processor::TaskProcessor;
use super::{BackupTask, MirrorStats, RunSummary};
use crate::utils::config::Config;
use crate::utils::reporter::Reporter;

/// Fans a manifest out into one concurrent task per entry and waits for all
/// of them.
///
/// Each task owns a one-shot completion signal; the join loop consumes every
/// signal, in launch order, before the elapsed time is reported.
#[derive(Clone)]
pub struct BackupDispatcher {
    config: Arc<Config>,
    reporter: Arc<dyn Reporter>,
    processor: Arc<dyn TaskProcessor>,
}

impl BackupDispatcher {
    /// Dispatcher whose tasks mirror into the target folder.
    pub fn new(config: Config, reporter: Arc<dyn Reporter>) -> Self {
        let processor = Arc::new(Mirror::new(reporter.clone(), &config));
        Self::with_processor(config, reporter, processor)
    }

    pub fn with_processor(
        config: Config,
        reporter: Arc<dyn Reporter>,
        processor: Arc<dyn TaskProcessor>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            reporter,
            processor,
        }
    }

    /// Back up every entry of the manifest at `manifest` into `target`.
    ///
    /// Only an unreadable manifest or an uncreatable target fails the run;
    /// per-entry problems are reported and counted in the summary.
    pub async fn run(&self, manifest: &Path, target: &Path) -> Result<RunSummary> {
        create_folder(target).with_context(|| format!("cannot prepare target folder {}", target.display()))?;
        let entries = read_manifest(manifest).await?;
        info!("Manifest {} lists {} entries", manifest.display(), entries.len());
        Ok(self.dispatch(entries, target).await)
    }

    /// Launch one task per entry, then join them all.
    pub async fn dispatch(&self, entries: Vec<ManifestEntry>, target: &Path) -> RunSummary {
        let limit = match self.config.max_concurrency {
            0 => None,
            n => {
                debug!("Limiting to {} concurrent tasks", n);
                Some(Arc::new(Semaphore::new(n)))
            }
        };

        let start = Instant::now();
        let mut signals = Vec::with_capacity(entries.len());

        for entry in &entries {
            let (done_tx, done_rx) = oneshot::channel();
            let task = BackupTask::new(entry, target.to_path_buf());
            self.launch(task, limit.clone(), done_tx);
            signals.push((entry, done_rx));
        }

        let mut summary = RunSummary {
            tasks_launched: signals.len(),
            ..RunSummary::default()
        };

        for (entry, done_rx) in signals {
            match done_rx.await {
                Ok(stats) => summary.stats += stats,
                Err(_) => {
                    summary.lost_tasks += 1;
                    let path = entry.path.to_string_lossy();
                    warn!("Task for manifest line {} ({}) ended without completing", entry.line, path);
                    self.reporter.error(
                        &format!("Backup of {} stopped unexpectedly", path),
                        Some(path.as_ref()),
                    );
                }
            }
            summary.signals_consumed += 1;
        }

        summary.elapsed = start.elapsed();
        self.reporter.info(
            &format!("Time taken: {}", humantime::format_duration(summary.elapsed)),
            None,
        );

        summary
    }

    fn launch(
        &self,
        task: BackupTask,
        limit: Option<Arc<Semaphore>>,
        done_tx: oneshot::Sender<MirrorStats>,
    ) {
        let processor = self.processor.clone();

        match limit {
            None => {
                tokio::task::spawn_blocking(move || {
                    let stats = processor.process_task(&task);
                    let _ = done_tx.send(stats);
                });
            }
            Some(limit) => {
                tokio::spawn(async move {
                    // Closing never happens; a failed acquire drops the signal.
                    let Ok(_permit) = limit.acquire_owned().await else {
                        return;
                    };
                    if let Ok(stats) =
                        tokio::task::spawn_blocking(move || processor.process_task(&task)).await
                    {
                        let _ = done_tx.send(stats);
                    }
                });
            }
        }
    }
}
