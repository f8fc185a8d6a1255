//! Error types for enumeration, navigation, and dump rendering.

use thiserror::Error;

/// Returned by node accessors once the backing snapshot has been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("enumeration snapshot has been released")]
pub struct StaleSnapshotError;

/// Errors raised by an enumeration provider while producing a snapshot.
#[derive(Debug, Error)]
pub enum EnumerationError {
    #[error("host controller unavailable: {0}")]
    HostControllerUnavailable(String),
    #[error("permission denied while enumerating: {0}")]
    PermissionDenied(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while rendering a dump.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error(transparent)]
    Stale(#[from] StaleSnapshotError),
    /// The device chain under `filename` nests deeper than the USB tier
    /// limit allows; the provider data is presumed cyclic or corrupt.
    #[error("device chain under '{filename}' exceeds the {limit}-tier depth limit")]
    DepthLimitExceeded { filename: String, limit: usize },
}
