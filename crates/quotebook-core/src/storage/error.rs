//! Storage errors
//!
//! I/O failures are classified so the CLI can tell the user what to fix
//! when a failure is on their side (permissions, disk space).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a key-value storage
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot create storage directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied on '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left while writing '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Value could not be encoded before writing
    #[error("Cannot encode '{key}': {details}")]
    Serialize { key: String, details: String },

    /// The temp file was written but could not replace the entry
    #[error("Cannot replace '{to}' with '{from}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classify a failed write to `path`
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied {
                path,
                source: error,
            }
        } else if is_out_of_space(&error) {
            StorageError::DiskFull {
                path,
                source: error,
            }
        } else {
            StorageError::Write {
                path,
                source: error,
            }
        }
    }

    /// Whether the user can fix the cause and simply retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::CreateDirectory { .. }
                | StorageError::PermissionDenied { .. }
                | StorageError::DiskFull { .. }
        )
    }

    /// What to do about a recoverable error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::CreateDirectory { .. } => {
                Some("Set data_dir to a writable location: quotebook config set data_dir <path>")
            }
            StorageError::PermissionDenied { .. } => {
                Some("Make the Quotebook data directory writable, or point data_dir elsewhere.")
            }
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            _ => None,
        }
    }
}

fn is_out_of_space(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    ["no space left", "disk full", "quota exceeded", "not enough space"]
        .iter()
        .any(|needle| msg.contains(needle))
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_recoverable() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::from_io(io_err, PathBuf::from("/data/quotes.json"));

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_out_of_space_is_disk_full() {
        let io_err = io::Error::new(io::ErrorKind::Other, "No space left on device");
        let err = StorageError::from_io(io_err, PathBuf::from("/full/quotes.json"));

        assert!(matches!(err, StorageError::DiskFull { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_other_failures_have_no_suggestion() {
        let io_err = io::Error::new(io::ErrorKind::Other, "bad descriptor");
        let err = StorageError::from_io(io_err, PathBuf::from("/data/last_filter"));

        assert!(matches!(err, StorageError::Write { .. }));
        assert!(!err.is_recoverable());
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_every_recoverable_error_has_a_suggestion() {
        let errors = [
            StorageError::CreateDirectory {
                path: PathBuf::from("/ro"),
                source: io::Error::new(io::ErrorKind::Other, "read-only"),
            },
            StorageError::from_io(
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                PathBuf::from("/data"),
            ),
            StorageError::Serialize {
                key: "quotes.json".to_string(),
                details: "bad".to_string(),
            },
        ];

        for err in &errors {
            assert_eq!(err.is_recoverable(), err.recovery_suggestion().is_some());
        }
    }

    #[test]
    fn test_display_names_the_path() {
        let err = StorageError::from_io(
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/data/quotes.json"),
        );
        assert!(err.to_string().contains("/data/quotes.json"));
    }
}
