//! Error types for the blob-backed file store.

/// Failure reported by an object-storage client.
///
/// Clients surface every failure as pass/fail plus an optional HTTP-style
/// status code. The store never retries these; they propagate as
/// [`StoreError::Backend`].
///
/// # Examples
///
/// ```rust
/// use blobfs::BackendError;
///
/// let err = BackendError::not_found("container/missing.txt");
/// assert!(err.is_not_found());
/// assert_eq!(err.to_string(), "status 404: blob not found: container/missing.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{message}", status_prefix(.status))]
pub struct BackendError {
    /// Status code reported by the backend, if any.
    pub status: Option<u16>,
    /// Human-readable failure description.
    pub message: String,
}

fn status_prefix(status: &Option<u16>) -> String {
    status.map(|s| format!("status {s}: ")).unwrap_or_default()
}

impl BackendError {
    /// Create an error carrying a status code.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create an error without a status code (transport failures and the like).
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// A 404 for the given key.
    pub fn not_found(key: &str) -> Self {
        Self::new(404, format!("blob not found: {key}"))
    }

    /// A 409 with the given reason.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(409, message)
    }

    /// Returns `true` if the backend reported the target as absent.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Returns `true` if the backend reported a conflicting state.
    #[inline]
    pub fn is_conflict(&self) -> bool {
        self.status == Some(409)
    }
}

/// File store error type.
///
/// Every variant is distinguishable by the caller. Idempotent deletes report
/// absence through their `bool` return value instead of an error.
///
/// # Examples
///
/// ```rust
/// use blobfs::StoreError;
///
/// let err = StoreError::NotFound { path: "docs/a.txt".into() };
/// assert_eq!(err.to_string(), "not found: docs/a.txt");
///
/// let err = StoreError::RootViolation { operation: "delete_directory" };
/// assert_eq!(err.to_string(), "delete_directory: the root directory cannot be deleted");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Requested file, stream or copy source does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The store path that was not found.
        path: String,
    },

    /// Create, copy or move target is already occupied by a file.
    #[error("{operation}: already exists: {path}")]
    AlreadyExists {
        /// The occupied store path.
        path: String,
        /// The operation that failed.
        operation: &'static str,
    },

    /// A directory was requested where a file already occupies the exact path.
    #[error("conflict: a file already exists at {path}")]
    Conflict {
        /// The conflicting store path.
        path: String,
    },

    /// The arguments of an operation are not usable together.
    #[error("{operation}: invalid argument: {reason}")]
    InvalidArgument {
        /// The operation that rejected its arguments.
        operation: &'static str,
        /// Why the arguments were rejected.
        reason: String,
    },

    /// Attempt to remove the store root.
    #[error("{operation}: the root directory cannot be deleted")]
    RootViolation {
        /// The operation that targeted the root.
        operation: &'static str,
    },

    /// The object-storage client failed.
    #[error("{operation} failed for '{path}': {source}")]
    Backend {
        /// The store operation in progress.
        operation: &'static str,
        /// The store path or object key involved.
        path: String,
        /// The client failure.
        #[source]
        source: BackendError,
    },

    /// A server-side copy reached a terminal state other than success.
    #[error("copy to {path} ended with status {status}: {description}")]
    CopyFailed {
        /// Destination store path.
        path: String,
        /// Terminal copy status reported by the backend.
        status: crate::CopyStatus,
        /// Backend-provided status description.
        description: String,
    },

    /// A server-side copy was still pending after the configured poll budget.
    #[error("copy to {path} still pending after {attempts} status checks")]
    Timeout {
        /// Destination store path.
        path: String,
        /// Number of status checks performed.
        attempts: u32,
    },

    /// Invalid data encountered.
    #[error("invalid data: {path} ({details})")]
    InvalidData {
        /// The path with invalid data.
        path: String,
        /// Details about the invalid data.
        details: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl StoreError {
    /// Wrap a client failure with the operation and path it happened on.
    pub(crate) fn backend(operation: &'static str, path: &str, source: BackendError) -> Self {
        StoreError::Backend {
            operation,
            path: path.to_owned(),
            source,
        }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
