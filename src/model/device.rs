//! Device node handle.

use super::descriptor::DeviceDescriptor;
use super::indent_block;
use crate::error::{DumpError, StaleSnapshotError};
use crate::snapshot::SnapshotInner;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Maximum nesting depth the dump walk will follow.
///
/// The USB topology is physically limited to 7 tiers, so anything deeper
/// means the provider handed over cyclic or corrupt chain data; the walk
/// fails closed instead of looping.
pub const MAX_DEVICE_TIERS: usize = 7;

/// Read-only view of one USB device within a snapshot.
///
/// Devices form sibling chains (bus-level, or the child chain of a hub).
/// Identity (`filename` plus the owning bus location) is cached in the
/// handle, so equality, hashing, and `Display` survive snapshot release;
/// navigation and descriptor access fail with [`StaleSnapshotError`] once
/// the snapshot is gone.
#[derive(Clone)]
pub struct DeviceNode {
    snapshot: Arc<SnapshotInner>,
    index: usize,
    filename: String,
    bus_location: u32,
}

impl DeviceNode {
    pub(crate) fn new(snapshot: Arc<SnapshotInner>, index: usize) -> Self {
        let record = &snapshot.devices[index];
        let filename = record.filename.clone();
        let bus_location = record.bus_location;
        Self {
            snapshot,
            index,
            filename,
            bus_location,
        }
    }

    /// Filename of the device, unique within its bus. Never empty while the
    /// snapshot is live.
    pub fn filename(&self) -> Result<&str, StaleSnapshotError> {
        self.snapshot.check_live()?;
        Ok(&self.filename)
    }

    /// The next sibling in this chain, or `None` at the end.
    pub fn next(&self) -> Result<Option<DeviceNode>, StaleSnapshotError> {
        self.snapshot.check_live()?;
        Ok(self.snapshot.devices[self.index]
            .next
            .map(|index| DeviceNode::new(self.snapshot.clone(), index)))
    }

    /// The previous sibling in this chain, or `None` at the start.
    pub fn previous(&self) -> Result<Option<DeviceNode>, StaleSnapshotError> {
        self.snapshot.check_live()?;
        Ok(self.snapshot.devices[self.index]
            .prev
            .map(|index| DeviceNode::new(self.snapshot.clone(), index)))
    }

    /// Head of this device's child chain (hub ports), or `None` for non-hub
    /// devices.
    pub fn children(&self) -> Result<Option<DeviceNode>, StaleSnapshotError> {
        self.snapshot.check_live()?;
        Ok(self.snapshot.devices[self.index]
            .children
            .map(|index| DeviceNode::new(self.snapshot.clone(), index)))
    }

    /// Descriptor summary supplied by the enumeration provider.
    pub fn descriptor(&self) -> Result<&DeviceDescriptor, StaleSnapshotError> {
        self.snapshot.check_live()?;
        Ok(&self.snapshot.devices[self.index].descriptor)
    }

    /// Render this device, its descriptor, and all nested children as an
    /// indented report. Child blocks shift right by two spaces per tier.
    pub fn dump(&self) -> Result<String, DumpError> {
        self.dump_at(0)
    }

    pub(crate) fn dump_at(&self, depth: usize) -> Result<String, DumpError> {
        if depth >= MAX_DEVICE_TIERS {
            return Err(DumpError::DepthLimitExceeded {
                filename: self.filename.clone(),
                limit: MAX_DEVICE_TIERS,
            });
        }
        let mut out = format!("Device:\n  filename {:>21}\n", self.filename()?);
        out.push_str(&indent_block(&self.descriptor()?.dump()));
        let mut child = self.children()?;
        while let Some(current) = child {
            out.push_str(&indent_block(&current.dump_at(depth + 1)?));
            child = current.next()?;
        }
        Ok(out)
    }
}

impl PartialEq for DeviceNode {
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename && self.bus_location == other.bus_location
    }
}

impl Eq for DeviceNode {}

impl Hash for DeviceNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.filename.hash(state);
        self.bus_location.hash(state);
    }
}

impl fmt::Display for DeviceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filename)
    }
}

impl fmt::Debug for DeviceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceNode")
            .field("filename", &self.filename)
            .field("bus_location", &self.bus_location)
            .finish()
    }
}
