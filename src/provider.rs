//! Enumeration provider seam.

use crate::error::EnumerationError;
use crate::snapshot::Snapshot;

/// Source of topology snapshots.
///
/// Implementations wrap a native enumeration facility (libusb, a sysfs
/// walker, a remote agent) and materialize one scan's results into a
/// [`Snapshot`] through
/// [`SnapshotBuilder`](crate::snapshot::SnapshotBuilder). This crate never
/// retries a failed scan; retry policy belongs to the provider.
pub trait EnumerationProvider {
    /// Enumerate all buses and devices currently visible to the host
    /// controller.
    fn scan(&self) -> Result<Snapshot, EnumerationError>;
}
