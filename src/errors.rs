//! Graph session errors
//!
//! Every storage operation surfaces one of these. Nothing is retried locally; the
//! caller decides whether a failure ends the process.

use thiserror::Error;

/// Result type for graph session operations
pub type GraphSessionResult<T> = Result<T, GraphSessionError>;

/// Errors that can occur while talking to the graph store
#[derive(Debug, Error)]
pub enum GraphSessionError {
    /// The backing connection could not be reached or rejected the request
    #[error("{operation}: storage unavailable: {reason}")]
    StorageUnavailable {
        operation: &'static str,
        reason: String,
    },

    /// The storage layer rejected a record, a name or a duplicate
    #[error("{operation}: validation error: {reason}")]
    ValidationError {
        operation: &'static str,
        reason: String,
    },

    /// No document with that identity in that collection
    #[error("document not found: {identity} in collection '{collection}'")]
    NotFound { collection: String, identity: String },

    /// An edge endpoint does not resolve to an existing vertex
    #[error("dangling reference: edge endpoint '{identity}' does not resolve to a vertex")]
    DanglingReference { identity: String },

    /// The caller cancelled the operation or its deadline expired
    #[error("{operation}: cancelled")]
    Cancelled { operation: &'static str },

    /// A record could not be converted to or from its stored form
    #[error("{operation}: serialization error: {source}")]
    Serialization {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid connection configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GraphSessionError {
    pub(crate) fn unavailable(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn validation(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(collection: impl Into<String>, identity: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            identity: identity.into(),
        }
    }

    /// Whether a caller with a retry policy could try the operation again.
    ///
    /// Only transport failures qualify; everything else is terminal for the
    /// operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// Check for the not-found case
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
