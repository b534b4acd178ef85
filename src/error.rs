use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single artifact during a mirror.
///
/// None of these abort a run: the mirror reports them where they happen and
/// moves on to the next sibling.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("cannot open {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create folder {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot list folder {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("copy of {from} to {to} failed: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot sync {path}: {source}")]
    Sync {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} has no final path segment to name its copy after")]
    Unnamed(PathBuf),
}

impl MirrorError {
    /// Path of the artifact that failed.
    pub fn path(&self) -> &PathBuf {
        match self {
            MirrorError::SourceUnreadable { path, .. }
            | MirrorError::Stat { path, .. }
            | MirrorError::CreateDirectory { path, .. }
            | MirrorError::ReadDirectory { path, .. }
            | MirrorError::CreateFile { path, .. }
            | MirrorError::Sync { path, .. }
            | MirrorError::Unnamed(path) => path,
            MirrorError::Copy { to, .. } => to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_messages_name_the_path() {
        let err = MirrorError::CreateFile {
            path: PathBuf::from("/backup/a.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "cannot create file /backup/a.txt: denied");
        assert_eq!(err.path(), &PathBuf::from("/backup/a.txt"));
    }

    #[test]
    fn test_copy_error_points_at_destination() {
        let err = MirrorError::Copy {
            from: PathBuf::from("/src/a"),
            to: PathBuf::from("/dst/a"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(err.path(), &PathBuf::from("/dst/a"));
    }
}
