use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// A source path listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 1-based line number in the manifest
    pub line: usize,
    pub path: PathBuf,
}

/// Read the manifest at `path` as an ordered list of entries.
///
/// Lines are taken as raw bytes, so paths that are not valid UTF-8 survive.
/// Blank and whitespace-only lines are skipped and a trailing `\r` is dropped;
/// everything else on a line is taken verbatim as a path. Duplicates are kept.
///
/// Only failing to open the manifest is an error. A read failure part way
/// through is logged and the lines read so far are returned.
pub async fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    let file = File::open(path)
        .await
        .with_context(|| format!("cannot open manifest {}", path.display()))?;

    let mut lines = BufReader::new(file).split(b'\n');
    let mut entries = Vec::new();
    let mut line_number = 0;

    loop {
        let mut line = match lines.next_segment().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(
                    "Stopped reading manifest {} after line {}: {}",
                    path.display(),
                    line_number,
                    e
                );
                break;
            }
        };
        line_number += 1;

        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            debug!("Skipping blank manifest line {}", line_number);
            continue;
        }
        entries.push(ManifestEntry {
            line: line_number,
            path: path_from_bytes(line),
        });
    }

    Ok(entries)
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_lines_in_order() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("manifest.txt");
        std::fs::write(&manifest, "/home/a\n\n  \n/home/b\r\n/home/a\n/home/with space").unwrap();

        let entries = read_manifest(&manifest).await.unwrap();

        let paths: Vec<_> = entries.iter().map(|e| e.path.to_string_lossy().to_string()).collect();
        assert_eq!(paths, vec!["/home/a", "/home/b", "/home/a", "/home/with space"]);
        let lines: Vec<_> = entries.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 4, 5, 6]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_line_is_kept() {
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("manifest.txt");
        std::fs::write(&manifest, b"/srv/good.txt\n/tmp/caf\xe9\n/srv/after.txt\n").unwrap();

        let entries = read_manifest(&manifest).await.unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].path.as_os_str().as_bytes(), b"/tmp/caf\xe9");
        assert_eq!(entries[2].path, PathBuf::from("/srv/after.txt"));
    }

    #[tokio::test]
    async fn test_empty_manifest() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("empty.txt");
        std::fs::write(&manifest, "").unwrap();

        assert!(read_manifest(&manifest).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_manifest_is_an_error() {
        let err = read_manifest(Path::new("/no/such/manifest.txt")).await.unwrap_err();
        assert!(err.to_string().contains("cannot open manifest"));
    }
}
