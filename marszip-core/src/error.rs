use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot access {}: {source}", .path.display())]
    IoUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move {} -> {}: {source}", .from.display(), .to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create archive {}: {reason}", .path.display())]
    ArchiveCreateFailed { path: PathBuf, reason: String },

    #[error("failed to extract {entry} from {}: {reason}", .source_path.display())]
    ExtractEntryFailed {
        source_path: PathBuf,
        entry: String,
        reason: String,
    },

    #[error("failed to clean up {}: {source}", .path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl MarsError {
    /// Fatal kinds halt the whole run; the rest are logged at the batch or
    /// entry boundary and processing resumes with the next unit of work.
    pub fn is_fatal(&self) -> bool {
        match self {
            MarsError::Io(_)
            | MarsError::IoUnavailable { .. }
            | MarsError::MoveFailed { .. }
            | MarsError::InvalidOptions(_)
            | MarsError::Config(_) => true,
            MarsError::ArchiveCreateFailed { .. }
            | MarsError::ExtractEntryFailed { .. }
            | MarsError::CleanupFailed { .. }
            | MarsError::Zip(_)
            | MarsError::Format(_) => false,
        }
    }

    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MarsError::IoUnavailable {
            path: path.into(),
            source,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, MarsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn fatal_kinds_follow_propagation_policy() {
        let io_err = || io::Error::new(io::ErrorKind::PermissionDenied, "denied");

        assert!(MarsError::unavailable("/src", io_err()).is_fatal());
        assert!(
            MarsError::MoveFailed {
                from: "a".into(),
                to: "b".into(),
                source: io_err(),
            }
            .is_fatal()
        );
        assert!(MarsError::InvalidOptions("batch_size".into()).is_fatal());

        assert!(
            !MarsError::ArchiveCreateFailed {
                path: "x.zip".into(),
                reason: "disk full".into(),
            }
            .is_fatal()
        );
        assert!(
            !MarsError::CleanupFailed {
                path: "dir".into(),
                source: io_err(),
            }
            .is_fatal()
        );
    }

    #[test]
    fn messages_carry_path_context() {
        let e = MarsError::MoveFailed {
            from: "/in/a.txt".into(),
            to: "/in/MarsGoExe_1/a.txt".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/in/a.txt"));
        assert!(msg.contains("MarsGoExe_1"));
        assert!(msg.contains("gone"));
    }
}
