use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

use mirror_backup::backup::mirror::create_folder;
use mirror_backup::backup::BackupDispatcher;
use mirror_backup::cli;
use mirror_backup::utils::{config, logging, LogBuffer, ReportLevel, Reporter, TeeReporter, TracingReporter};

/// Recent error lines repeated in the closing summary.
const RECENT_ERRORS: usize = 20;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "mirror-backup".to_string());

    let Some(invocation) = cli::parse_args(args) else {
        print!("{}", cli::usage_message(&program));
        std::process::exit(0);
    };

    dotenvy::dotenv().ok();
    let config = config::load_config()?;

    // The log file lives in the target folder, so it has to exist first.
    create_folder(&invocation.target)
        .with_context(|| format!("cannot create target folder {}", invocation.target.display()))?;

    if config.log_to_file {
        let log_path = logging::init_tracing_with_log_file(&invocation.target, &config.log_prefix)?;
        info!("Logging to {}", log_path.display());
    } else {
        logging::init_tracing();
    }

    info!(
        "Backing up entries of {} into {}",
        invocation.manifest.display(),
        invocation.target.display()
    );

    let recent = LogBuffer::new(RECENT_ERRORS);
    let reporter: Arc<dyn Reporter> = Arc::new(TeeReporter::new(vec![
        Arc::new(TracingReporter),
        Arc::new(ErrorsOnly(recent.clone())),
    ]));

    let dispatcher = BackupDispatcher::new(config, reporter);
    let summary = match dispatcher.run(&invocation.manifest, &invocation.target).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    info!(
        "{} entries: {} files ({} bytes) and {} folders copied, {} skipped, {} failed",
        summary.tasks_launched,
        summary.stats.files_copied,
        summary.stats.bytes_copied,
        summary.stats.folders,
        summary.stats.skipped,
        summary.stats.failed + summary.lost_tasks as u64,
    );

    if summary.stats.failed > 0 || summary.lost_tasks > 0 {
        warn!("Some artifacts were not copied; most recent errors:");
        for log in recent.get_logs(None) {
            warn!("  {}", log.message);
        }
    }

    Ok(())
}

/// Keeps only error reports, so the closing summary is not crowded out by
/// progress lines.
struct ErrorsOnly(LogBuffer);

impl Reporter for ErrorsOnly {
    fn report(&self, level: ReportLevel, message: &str, entry: Option<&str>) {
        if level == ReportLevel::Error {
            self.0.report(level, message, entry);
        }
    }
}
