use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for jackson-fixup
#[derive(Error, Debug)]
pub enum FixupError {
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("IO error on {}: {source}", .path.display())]
    Io { source: io::Error, path: PathBuf },

    /// The staged content could not be renamed over the target. The target is untouched.
    #[error("Failed to move staged content into {}: {source}", .path.display())]
    Persist { source: io::Error, path: PathBuf },

    /// The target was already deleted when the move failed. Its new content only lives at `staged`.
    #[error(
        "Original {} was removed but the staged copy could not be moved into place; content kept at {}: {source}",
        .path.display(),
        .staged.display()
    )]
    Stranded {
        source: io::Error,
        path: PathBuf,
        staged: PathBuf,
    },

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl FixupError {
    /// Classify an IO error against the path it happened on
    pub fn io_error(err: io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { source: err, path },
        }
    }

    pub fn config_error(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path the error is about
    pub fn path(&self) -> &Path {
        match self {
            FixupError::NotFound { path }
            | FixupError::PermissionDenied { path }
            | FixupError::Io { path, .. }
            | FixupError::Persist { path, .. }
            | FixupError::Stranded { path, .. }
            | FixupError::Config { path, .. } => path,
        }
    }

    /// Whether the original content may have been lost
    pub fn is_data_loss(&self) -> bool {
        matches!(self, FixupError::Stranded { .. })
    }
}

/// Result type alias using FixupError
pub type FixupResult<T> = Result<T, FixupError>;

/// Contextual error mapping function
pub fn map_io_err<P: Into<PathBuf>>(path: P) -> impl FnOnce(io::Error) -> FixupError {
    let path = path.into();
    move |err| FixupError::io_error(err, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_classification() {
        let err = FixupError::io_error(io::Error::from(io::ErrorKind::NotFound), "a.cs");
        assert!(matches!(err, FixupError::NotFound { .. }));
        assert_eq!(err.path(), Path::new("a.cs"));

        let err = FixupError::io_error(io::Error::from(io::ErrorKind::PermissionDenied), "b.cs");
        assert!(matches!(err, FixupError::PermissionDenied { .. }));

        let err = map_io_err("c.cs")(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        assert!(matches!(err, FixupError::Io { .. }));
        assert!(err.to_string().contains("disk on fire"));
        assert!(!err.is_data_loss());
    }

    #[test]
    fn test_stranded_reports_both_paths() {
        let err = FixupError::Stranded {
            source: io::Error::new(io::ErrorKind::Other, "cross-device"),
            path: PathBuf::from("Foo.cs"),
            staged: PathBuf::from("/tmp/.tmpXYZ"),
        };
        let message = err.to_string();
        assert!(message.contains("Foo.cs"));
        assert!(message.contains("/tmp/.tmpXYZ"));
        assert!(err.is_data_loss());
    }
}
