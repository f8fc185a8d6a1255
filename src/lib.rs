//! Read-only snapshots of USB bus/device topology.
//!
//! An enumeration provider (a libusb wrapper, a sysfs walker, a remote agent)
//! scans the host and materializes the result into a [`Snapshot`] via
//! [`SnapshotBuilder`]. The snapshot owns all bus and descriptor data;
//! [`BusNode`] and [`DeviceNode`] are lightweight handles that navigate it
//! without copying. Releasing (or dropping) the snapshot invalidates every
//! handle derived from it: further accessor calls fail with
//! [`StaleSnapshotError`] instead of reading stale data.
//!
//! Each node can render itself as an indented textual report via `dump()`,
//! recursing through hub-nested devices.

pub mod error;
pub mod model;
pub mod provider;
pub mod snapshot;

pub use error::{DumpError, EnumerationError, StaleSnapshotError};
pub use model::{BcdVersion, BusNode, DeviceDescriptor, DeviceNode, MAX_DEVICE_TIERS};
pub use provider::EnumerationProvider;
pub use snapshot::{BusId, DeviceId, Snapshot, SnapshotBuilder};
