//! Incremental construction of enumeration snapshots.

use super::{BusRecord, DeviceRecord, Snapshot, SnapshotInner};
use crate::model::DeviceDescriptor;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Handle to a bus registered with a [`SnapshotBuilder`].
///
/// Only meaningful with the builder that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusId(pub(crate) usize);

/// Handle to a device registered with a [`SnapshotBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(pub(crate) usize);

/// One sibling chain: either the bus-level chain or a hub's child chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum ChainKey {
    Bus(usize),
    Device(usize),
}

/// Assembles the records backing one [`Snapshot`].
///
/// Providers append buses and devices in enumeration order; sibling links are
/// derived from insertion order, so chains cannot form a cycle. Identifier
/// strings (`dirname`, `filename`) must be non-empty, per the provider
/// contract this builder passes through.
#[derive(Default)]
pub struct SnapshotBuilder {
    buses: Vec<BusRecord>,
    devices: Vec<DeviceRecord>,
    tails: HashMap<ChainKey, usize>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bus at the end of the bus sequence.
    pub fn add_bus(&mut self, dirname: impl Into<String>, location: u32) -> BusId {
        self.buses.push(BusRecord {
            dirname: dirname.into(),
            location,
            devices: None,
            root_device: None,
        });
        BusId(self.buses.len() - 1)
    }

    /// Register a device at the tail of its sibling chain.
    ///
    /// With `parent` of `None` the device joins the bus-level chain;
    /// otherwise it becomes the last child of the given hub device.
    pub fn add_device(
        &mut self,
        bus: BusId,
        parent: Option<DeviceId>,
        filename: impl Into<String>,
        descriptor: DeviceDescriptor,
    ) -> DeviceId {
        let index = self.devices.len();
        self.devices.push(DeviceRecord {
            filename: filename.into(),
            bus_location: self.buses[bus.0].location,
            descriptor,
            next: None,
            prev: None,
            children: None,
        });

        let key = match parent {
            Some(hub) => ChainKey::Device(hub.0),
            None => ChainKey::Bus(bus.0),
        };
        match self.tails.insert(key, index) {
            Some(tail) => {
                self.devices[tail].next = Some(index);
                self.devices[index].prev = Some(tail);
            }
            None => match key {
                ChainKey::Bus(bus_index) => self.buses[bus_index].devices = Some(index),
                ChainKey::Device(hub_index) => self.devices[hub_index].children = Some(index),
            },
        }
        DeviceId(index)
    }

    /// Mark `device` as the root device of `bus`.
    ///
    /// Left unset, the bus reports its root device as undetermined.
    pub fn set_root_device(&mut self, bus: BusId, device: DeviceId) {
        self.buses[bus.0].root_device = Some(device.0);
    }

    /// Freeze the records into an immutable snapshot.
    pub fn finish(self) -> Snapshot {
        Snapshot {
            inner: Arc::new(SnapshotInner {
                buses: self.buses,
                devices: self.devices,
                released: AtomicBool::new(false),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BcdVersion;

    fn descriptor() -> DeviceDescriptor {
        DeviceDescriptor {
            usb_version: BcdVersion(0x0200),
            device_class: 0x00,
            device_subclass: 0,
            device_protocol: 0,
            vendor_id: 0x046d,
            product_id: 0xc52b,
            device_version: BcdVersion(0x0100),
            num_configurations: 1,
        }
    }

    #[test]
    fn test_first_device_becomes_chain_head() {
        let mut builder = SnapshotBuilder::new();
        let bus = builder.add_bus("001", 1);
        builder.add_device(bus, None, "001", descriptor());
        builder.add_device(bus, None, "002", descriptor());
        let snapshot = builder.finish();

        let head = snapshot
            .first_bus()
            .unwrap()
            .unwrap()
            .devices()
            .unwrap()
            .unwrap();
        assert_eq!(head.filename().unwrap(), "001");
        assert!(head.previous().unwrap().is_none());

        let second = head.next().unwrap().unwrap();
        assert_eq!(second.filename().unwrap(), "002");
        assert_eq!(second.previous().unwrap().unwrap(), head);
        assert!(second.next().unwrap().is_none());
    }

    #[test]
    fn test_child_chain_attaches_to_hub() {
        let mut builder = SnapshotBuilder::new();
        let bus = builder.add_bus("001", 1);
        let hub = builder.add_device(bus, None, "002", descriptor());
        builder.add_device(bus, Some(hub), "003", descriptor());
        builder.add_device(bus, Some(hub), "004", descriptor());
        let snapshot = builder.finish();

        let hub_node = snapshot
            .first_bus()
            .unwrap()
            .unwrap()
            .devices()
            .unwrap()
            .unwrap();
        let first_child = hub_node.children().unwrap().unwrap();
        assert_eq!(first_child.filename().unwrap(), "003");
        assert_eq!(
            first_child.next().unwrap().unwrap().filename().unwrap(),
            "004"
        );
        // Children do not leak into the bus-level chain.
        assert!(hub_node.next().unwrap().is_none());
    }

    #[test]
    fn test_root_device_defaults_to_unknown() {
        let mut builder = SnapshotBuilder::new();
        let bus = builder.add_bus("001", 1);
        let root = builder.add_device(bus, None, "001", descriptor());
        builder.add_bus("002", 2);
        builder.set_root_device(bus, root);
        let snapshot = builder.finish();

        let buses = snapshot.buses().unwrap();
        let root_node = buses[0].root_device().unwrap().unwrap();
        assert_eq!(root_node.filename().unwrap(), "001");
        assert!(buses[1].root_device().unwrap().is_none());
    }
}
