//! Error types for as2-partnership.
//!
//! All errors are strongly typed using thiserror so call sites can match on
//! the specific condition. Note that the outgoing dump path has no error
//! channel except for `close`: see [`crate::dump`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid arguments passed to a mutating operation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Attribute key for {store} cannot be empty")]
    EmptyKey {
        store: &'static str,
    },

    #[error("Partner name cannot be empty")]
    EmptyName,

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },
}

/// Errors raised by the in-memory partner directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("A partner named '{name}' is already registered")]
    DuplicateName {
        name: String,
    },

    #[error("No partner matches sender {sender} and receiver {receiver}")]
    NoMatch {
        sender: String,
        receiver: String,
    },
}

/// Errors from outgoing dump sinks.
///
/// Only [`DumpError::Teardown`] can come out of a dumper itself (from `close`).
/// The other variants are reported by the session and factory layers.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Failed to release dump sink: {source}")]
    Teardown {
        #[source]
        source: io::Error,
    },

    #[error("Failed to open dump file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Dump observer panicked during {stage}")]
    ObserverPanicked {
        stage: &'static str,
    },
}

/// Top-level error type for as2-partnership.
#[derive(Debug, Error)]
pub enum PartnershipError {
    #[error("Invalid argument: {0}")]
    Validation(#[from] ValidationError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Dump error: {0}")]
    Dump(#[from] DumpError),
}

impl PartnershipError {
    /// Returns true if the caller passed an invalid argument.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a dump sink teardown failure.
    ///
    /// A teardown failure must never be treated as a delivery failure.
    #[must_use]
    pub fn is_teardown(&self) -> bool {
        matches!(
            self,
            Self::Dump(DumpError::Teardown { .. } | DumpError::ObserverPanicked { stage: "close" })
        )
    }

    /// Returns true if no partner was found for a lookup.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Directory(DirectoryError::NoMatch { .. }))
    }
}

/// Result type alias for as2-partnership operations.
pub type PartnershipResult<T> = Result<T, PartnershipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_empty_key() {
        let err = ValidationError::EmptyKey { store: "sender IDs" };
        let msg = format!("{err}");
        assert!(msg.contains("sender IDs"));
        assert!(msg.contains("cannot be empty"));
    }

    #[test]
    fn test_directory_error_no_match() {
        let err = DirectoryError::NoMatch {
            sender: "{as2_id=A}".to_string(),
            receiver: "{as2_id=B}".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("as2_id=A"));
        assert!(msg.contains("as2_id=B"));
    }

    #[test]
    fn test_dump_error_open() {
        let err = DumpError::Open {
            path: PathBuf::from("/tmp/dump.http"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("/tmp/dump.http"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_partnership_error_from_validation() {
        let err: PartnershipError = ValidationError::EmptyName.into();
        assert!(err.is_invalid_argument());
        assert!(!err.is_teardown());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_partnership_error_teardown() {
        let err: PartnershipError = DumpError::Teardown {
            source: io::Error::new(io::ErrorKind::BrokenPipe, "pipe"),
        }
        .into();
        assert!(err.is_teardown());
        assert!(!err.is_invalid_argument());

        let panicked: PartnershipError = DumpError::ObserverPanicked { stage: "close" }.into();
        assert!(panicked.is_teardown());

        let open: PartnershipError = DumpError::Open {
            path: PathBuf::from("x"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        }
        .into();
        assert!(!open.is_teardown());
    }

    #[test]
    fn test_partnership_error_not_found() {
        let err: PartnershipError = DirectoryError::NoMatch {
            sender: "{}".to_string(),
            receiver: "{}".to_string(),
        }
        .into();
        assert!(err.is_not_found());

        let dup: PartnershipError = DirectoryError::DuplicateName {
            name: "acme".to_string(),
        }
        .into();
        assert!(!dup.is_not_found());
    }
}
