use super::{BackupTask, MirrorStats};
use super::task_processor::TaskProcessor;
use crate::error::MirrorError;
use crate::utils::config::Config;
use crate::utils::paths::{base_name, strip_trailing_separator, ContainmentCheck};
use crate::utils::reporter::Reporter;
use std::ffi::OsString;
use std::fs::{self, DirBuilder, File};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Recursively copies a file or folder into a destination folder.
///
/// Every failure is reported to the [`Reporter`] where it happens and only
/// costs the artifact it happened on; siblings and ancestors carry on.
pub struct Mirror {
    reporter: Arc<dyn Reporter>,
    containment: ContainmentCheck,
    sync_files: bool,
}

enum Source {
    Folder,
    File(File),
}

impl Mirror {
    pub fn new(reporter: Arc<dyn Reporter>, config: &Config) -> Self {
        Self {
            reporter,
            containment: config.containment,
            sync_files: config.sync_files,
        }
    }

    /// Mirror `source` to `destination/<name of source>`.
    pub fn mirror(&self, source: &Path, destination: &Path) -> MirrorStats {
        let entry = source.to_string_lossy();
        let mut stats = MirrorStats::default();
        self.mirror_into(source, destination, &entry, &mut stats);
        stats
    }

    fn mirror_into(&self, source: &Path, destination: &Path, entry: &str, stats: &mut MirrorStats) {
        let source_text = source.to_string_lossy();
        let destination_text = destination.to_string_lossy();
        let target = strip_trailing_separator(&destination_text);

        if self.containment.is_same_or_within(&source_text, target) {
            self.reporter.info(
                &format!(
                    "{} is the same as, or within the target folder {}. This artifact has not been copied",
                    source_text, target
                ),
                Some(entry),
            );
            stats.skipped += 1;
            return;
        }

        if let Err(e) = self.copy_artifact(source, destination, entry, stats) {
            stats.failed += 1;
            self.reporter.error(&e.to_string(), Some(entry));
        }
    }

    fn copy_artifact(
        &self,
        source: &Path,
        destination: &Path,
        entry: &str,
        stats: &mut MirrorStats,
    ) -> Result<(), MirrorError> {
        let opened = open_source(source)?;
        let target = destination.join(copy_name(source)?);

        match opened {
            Source::Folder => self.copy_folder(source, &target, entry, stats),
            Source::File(file) => self.copy_file(file, source, &target, entry, stats),
        }
    }

    fn copy_folder(
        &self,
        source: &Path,
        folder: &Path,
        entry: &str,
        stats: &mut MirrorStats,
    ) -> Result<(), MirrorError> {
        self.reporter.info(&format!("Creating folder {}", folder.display()), Some(entry));
        create_folder(folder)?;
        stats.folders += 1;

        let children = fs::read_dir(source).map_err(|e| MirrorError::ReadDirectory {
            path: source.to_path_buf(),
            source: e,
        })?;

        // Listing order, one child at a time.
        for child in children {
            match child {
                Ok(child) => self.mirror_into(&child.path(), folder, entry, stats),
                Err(e) => {
                    stats.failed += 1;
                    let err = MirrorError::ReadDirectory {
                        path: source.to_path_buf(),
                        source: e,
                    };
                    self.reporter.error(&err.to_string(), Some(entry));
                }
            }
        }

        Ok(())
    }

    fn copy_file(
        &self,
        mut source_file: File,
        source: &Path,
        target: &Path,
        entry: &str,
        stats: &mut MirrorStats,
    ) -> Result<(), MirrorError> {
        let mut target_file = File::create(target).map_err(|e| MirrorError::CreateFile {
            path: target.to_path_buf(),
            source: e,
        })?;

        let bytes = io::copy(&mut source_file, &mut target_file).map_err(|e| MirrorError::Copy {
            from: source.to_path_buf(),
            to: target.to_path_buf(),
            source: e,
        })?;

        if self.sync_files {
            target_file.sync_all().map_err(|e| MirrorError::Sync {
                path: target.to_path_buf(),
                source: e,
            })?;
        }

        stats.files_copied += 1;
        stats.bytes_copied += bytes;
        self.reporter.info(&format!("{} file copied", source.display()), Some(entry));
        Ok(())
    }
}

impl TaskProcessor for Mirror {
    fn process_task(&self, task: &BackupTask) -> MirrorStats {
        self.mirror(&task.source, &task.destination)
    }
}

fn open_source(source: &Path) -> Result<Source, MirrorError> {
    match File::open(source) {
        Ok(file) => {
            let metadata = file.metadata().map_err(|e| MirrorError::Stat {
                path: source.to_path_buf(),
                source: e,
            })?;
            if metadata.is_dir() {
                Ok(Source::Folder)
            } else {
                Ok(Source::File(file))
            }
        }
        Err(e) => {
            // Windows will not open a directory handle without backup semantics.
            #[cfg(windows)]
            if fs::metadata(source).map(|m| m.is_dir()).unwrap_or(false) {
                return Ok(Source::Folder);
            }
            Err(MirrorError::SourceUnreadable {
                path: source.to_path_buf(),
                source: e,
            })
        }
    }
}

/// Name the copy of `source` gets inside its destination folder.
fn copy_name(source: &Path) -> Result<OsString, MirrorError> {
    let name = match source.to_str() {
        Some(text) => match base_name(strip_trailing_separator(text)) {
            "" | "." | ".." => None,
            name => Some(OsString::from(name)),
        },
        None => source.file_name().map(OsString::from),
    };

    name.or_else(|| {
        fs::canonicalize(source)
            .ok()
            .and_then(|resolved| resolved.file_name().map(OsString::from))
    })
    .ok_or_else(|| MirrorError::Unnamed(source.to_path_buf()))
}

/// Create `path` and any missing parents. An existing folder is fine.
pub fn create_folder(path: &Path) -> Result<(), MirrorError> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder.create(path).map_err(|e| MirrorError::CreateDirectory {
        path: path.to_path_buf(),
        source: e,
    })
}
