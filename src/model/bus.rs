//! Bus node handle.

use super::device::DeviceNode;
use super::indent_block;
use crate::error::{DumpError, StaleSnapshotError};
use crate::snapshot::SnapshotInner;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Read-only view of one USB bus within a snapshot.
///
/// Identity (`directory_name`, `location`) is cached in the handle, so
/// equality, hashing, and `Display` keep working even after the snapshot is
/// released; every other accessor checks the snapshot first and fails with
/// [`StaleSnapshotError`] once it is gone.
#[derive(Clone)]
pub struct BusNode {
    snapshot: Arc<SnapshotInner>,
    index: usize,
    dirname: String,
    location: u32,
}

impl BusNode {
    pub(crate) fn new(snapshot: Arc<SnapshotInner>, index: usize) -> Self {
        let record = &snapshot.buses[index];
        let dirname = record.dirname.clone();
        let location = record.location;
        Self {
            snapshot,
            index,
            dirname,
            location,
        }
    }

    /// Directory name of the bus. Never empty while the snapshot is live.
    pub fn directory_name(&self) -> Result<&str, StaleSnapshotError> {
        self.snapshot.check_live()?;
        Ok(&self.dirname)
    }

    /// Bus location code. Opaque but stable for the bus's lifetime.
    pub fn location(&self) -> Result<u32, StaleSnapshotError> {
        self.snapshot.check_live()?;
        Ok(self.location)
    }

    /// The next bus in enumeration order, or `None` at the end.
    pub fn next(&self) -> Result<Option<BusNode>, StaleSnapshotError> {
        self.snapshot.check_live()?;
        let next = self.index + 1;
        Ok((next < self.snapshot.buses.len()).then(|| BusNode::new(self.snapshot.clone(), next)))
    }

    /// The previous bus in enumeration order, or `None` at the start.
    pub fn previous(&self) -> Result<Option<BusNode>, StaleSnapshotError> {
        self.snapshot.check_live()?;
        Ok(self
            .index
            .checked_sub(1)
            .map(|index| BusNode::new(self.snapshot.clone(), index)))
    }

    /// Head of the device chain attached to this bus, or `None` if the bus
    /// has no (readable) devices. Siblings follow via [`DeviceNode::next`].
    pub fn devices(&self) -> Result<Option<DeviceNode>, StaleSnapshotError> {
        self.snapshot.check_live()?;
        Ok(self.snapshot.buses[self.index]
            .devices
            .map(|index| DeviceNode::new(self.snapshot.clone(), index)))
    }

    /// The bus's root device.
    ///
    /// `None` means the root device could not be determined; the provider
    /// does not distinguish a truly absent root device from one hidden by
    /// insufficient permissions, and neither does this view.
    pub fn root_device(&self) -> Result<Option<DeviceNode>, StaleSnapshotError> {
        self.snapshot.check_live()?;
        Ok(self.snapshot.buses[self.index]
            .root_device
            .map(|index| DeviceNode::new(self.snapshot.clone(), index)))
    }

    /// Render this bus and all attached devices as an indented report.
    ///
    /// The header block is followed by every bus-level device's dump, each
    /// line shifted right by two spaces, recursing through hub children.
    pub fn dump(&self) -> Result<String, DumpError> {
        let root_name = match self.root_device()? {
            Some(device) => device.filename()?.to_owned(),
            None => "None or unknown".to_owned(),
        };
        let mut out = format!(
            "Bus:\n  dirname {:>23}\n  location        {:>15}\n  root_dev {:>22}\n",
            self.directory_name()?,
            self.location()?,
            root_name
        );
        let mut device = self.devices()?;
        while let Some(current) = device {
            out.push_str(&indent_block(&current.dump()?));
            device = current.next()?;
        }
        Ok(out)
    }
}

impl PartialEq for BusNode {
    fn eq(&self, other: &Self) -> bool {
        self.dirname == other.dirname && self.location == other.location
    }
}

impl Eq for BusNode {}

impl Hash for BusNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dirname.hash(state);
        self.location.hash(state);
    }
}

impl fmt::Display for BusNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dirname)
    }
}

impl fmt::Debug for BusNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusNode")
            .field("dirname", &self.dirname)
            .field("location", &self.location)
            .finish()
    }
}
