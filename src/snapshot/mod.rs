//! Snapshot ownership of one enumeration result.
//!
//! A [`Snapshot`] owns the bus and device records produced by one provider
//! scan, laid out as index-linked arenas. Node handles keep the arena alive
//! through an `Arc` but honor a released flag: once the snapshot is released
//! (explicitly or by drop), every arena-touching accessor fails with
//! [`StaleSnapshotError`] rather than surfacing data from a superseded scan.

mod builder;

pub use builder::{BusId, DeviceId, SnapshotBuilder};

use crate::error::{DumpError, StaleSnapshotError};
use crate::model::{BusNode, DeviceDescriptor};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Arena record for one bus.
pub(crate) struct BusRecord {
    pub(crate) dirname: String,
    pub(crate) location: u32,
    /// Head of the bus-level device chain.
    pub(crate) devices: Option<usize>,
    pub(crate) root_device: Option<usize>,
}

/// Arena record for one device.
pub(crate) struct DeviceRecord {
    pub(crate) filename: String,
    /// Location of the owning bus; part of device identity, since filenames
    /// are only unique within a bus.
    pub(crate) bus_location: u32,
    pub(crate) descriptor: DeviceDescriptor,
    pub(crate) next: Option<usize>,
    pub(crate) prev: Option<usize>,
    /// Head of the nested child chain (hub ports).
    pub(crate) children: Option<usize>,
}

pub(crate) struct SnapshotInner {
    pub(crate) buses: Vec<BusRecord>,
    pub(crate) devices: Vec<DeviceRecord>,
    released: AtomicBool,
}

impl SnapshotInner {
    pub(crate) fn check_live(&self) -> Result<(), StaleSnapshotError> {
        if self.released.load(Ordering::Acquire) {
            Err(StaleSnapshotError)
        } else {
            Ok(())
        }
    }
}

/// One point-in-time enumeration result.
///
/// All [`BusNode`] and [`DeviceNode`](crate::model::DeviceNode) handles are
/// derived from a snapshot and are read-only; they may be shared across
/// threads freely while the snapshot is live. The snapshot does not track
/// outstanding handles: releasing it while handles are still in use is legal
/// and simply makes their accessors fail.
pub struct Snapshot {
    inner: Arc<SnapshotInner>,
}

impl Snapshot {
    /// All buses in enumeration order.
    pub fn buses(&self) -> Result<Vec<BusNode>, StaleSnapshotError> {
        self.inner.check_live()?;
        Ok((0..self.inner.buses.len())
            .map(|index| BusNode::new(self.inner.clone(), index))
            .collect())
    }

    /// The first bus, or `None` for an empty snapshot. The rest of the
    /// sequence is reachable through [`BusNode::next`].
    pub fn first_bus(&self) -> Result<Option<BusNode>, StaleSnapshotError> {
        self.inner.check_live()?;
        Ok((!self.inner.buses.is_empty()).then(|| BusNode::new(self.inner.clone(), 0)))
    }

    /// Number of buses captured by this snapshot.
    pub fn bus_count(&self) -> Result<usize, StaleSnapshotError> {
        self.inner.check_live()?;
        Ok(self.inner.buses.len())
    }

    /// Dump every bus in enumeration order as one report.
    ///
    /// Either returns the complete report or the first error hit while
    /// walking; never a truncated report.
    pub fn dump(&self) -> Result<String, DumpError> {
        let mut out = String::new();
        for bus in self.buses()? {
            out.push_str(&bus.dump()?);
        }
        Ok(out)
    }

    /// Release the snapshot, invalidating every node derived from it.
    ///
    /// Dropping the snapshot has the same effect; this form only makes the
    /// point of invalidation explicit at the call site.
    pub fn release(self) {
        self.inner.released.store(true, Ordering::Release);
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        self.inner.released.store(true, Ordering::Release);
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("buses", &self.inner.buses.len())
            .field("devices", &self.inner.devices.len())
            .field("released", &self.inner.released.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BcdVersion;

    fn descriptor() -> DeviceDescriptor {
        DeviceDescriptor {
            usb_version: BcdVersion(0x0200),
            device_class: 0x09,
            device_subclass: 0,
            device_protocol: 1,
            vendor_id: 0x1d6b,
            product_id: 0x0002,
            device_version: BcdVersion(0x0515),
            num_configurations: 1,
        }
    }

    #[test]
    fn test_buses_in_enumeration_order() {
        let mut builder = SnapshotBuilder::new();
        builder.add_bus("001", 1);
        builder.add_bus("002", 2);
        builder.add_bus("003", 3);
        let snapshot = builder.finish();

        let names: Vec<String> = snapshot
            .buses()
            .unwrap()
            .iter()
            .map(|bus| bus.directory_name().unwrap().to_owned())
            .collect();
        assert_eq!(names, ["001", "002", "003"]);
        assert_eq!(snapshot.bus_count().unwrap(), 3);
    }

    #[test]
    fn test_first_bus_of_empty_snapshot() {
        let snapshot = SnapshotBuilder::new().finish();
        assert!(snapshot.first_bus().unwrap().is_none());
        assert_eq!(snapshot.bus_count().unwrap(), 0);
    }

    #[test]
    fn test_release_invalidates_nodes() {
        let mut builder = SnapshotBuilder::new();
        let bus = builder.add_bus("001", 336);
        builder.add_device(bus, None, "001", descriptor());
        let snapshot = builder.finish();

        let node = snapshot.first_bus().unwrap().unwrap();
        let device = node.devices().unwrap().unwrap();
        snapshot.release();

        assert_eq!(node.directory_name(), Err(StaleSnapshotError));
        assert_eq!(node.location(), Err(StaleSnapshotError));
        assert_eq!(node.next().unwrap_err(), StaleSnapshotError);
        assert_eq!(node.devices().unwrap_err(), StaleSnapshotError);
        assert_eq!(device.filename(), Err(StaleSnapshotError));
        assert_eq!(device.next().unwrap_err(), StaleSnapshotError);
        assert!(matches!(
            node.dump(),
            Err(DumpError::Stale(StaleSnapshotError))
        ));
    }

    #[test]
    fn test_drop_invalidates_nodes() {
        let mut builder = SnapshotBuilder::new();
        builder.add_bus("001", 336);
        let snapshot = builder.finish();

        let node = snapshot.first_bus().unwrap().unwrap();
        drop(snapshot);

        assert_eq!(node.directory_name(), Err(StaleSnapshotError));
        // Cached identity still backs Display and equality for collections.
        assert_eq!(node.to_string(), "001");
    }

    #[test]
    fn test_snapshot_dump_concatenates_buses() {
        let mut builder = SnapshotBuilder::new();
        builder.add_bus("001", 1);
        builder.add_bus("002", 2);
        let snapshot = builder.finish();

        let buses = snapshot.buses().unwrap();
        let expected = format!(
            "{}{}",
            buses[0].dump().unwrap(),
            buses[1].dump().unwrap()
        );
        assert_eq!(snapshot.dump().unwrap(), expected);
    }
}
