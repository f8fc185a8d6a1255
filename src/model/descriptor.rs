//! Device descriptor summary passed through from the enumeration provider.

use std::fmt;

/// BCD-coded revision number as used by `bcdUSB` and `bcdDevice`.
///
/// Renders as `major.minor`, e.g. `0x0210` displays as "2.10".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BcdVersion(pub u16);

impl fmt::Display for BcdVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}.{:02x}", self.0 >> 8, self.0 & 0xff)
    }
}

/// Identity summary of one device, as supplied by the enumeration provider.
///
/// Fields mirror the standard USB device descriptor. This layer passes them
/// through for display and equality without interpreting them further.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceDescriptor {
    /// USB release supported by the device (bcdUSB).
    pub usb_version: BcdVersion,
    /// Device class code.
    pub device_class: u8,
    /// Device subclass code.
    pub device_subclass: u8,
    /// Device protocol code.
    pub device_protocol: u8,
    /// Vendor ID.
    pub vendor_id: u16,
    /// Product ID.
    pub product_id: u16,
    /// Device release number (bcdDevice).
    pub device_version: BcdVersion,
    /// Number of configurations.
    pub num_configurations: u8,
}

impl DeviceDescriptor {
    /// Is this a hub? (bDeviceClass == 0x09).
    pub fn is_hub(&self) -> bool {
        self.device_class == 0x09
    }

    /// Format VID:PID as string.
    pub fn vid_pid(&self) -> String {
        format!("{:04x}:{:04x}", self.vendor_id, self.product_id)
    }

    /// Render as a labeled field block, values right-aligned to a shared
    /// column. Vendor and product ids print as bare hex, revisions as BCD.
    pub fn dump(&self) -> String {
        let mut out = String::from("Device Descriptor:\n");
        out.push_str(&format!("  usb_version {:>12}\n", self.usb_version.to_string()));
        out.push_str(&format!("  device_class {:>11}\n", self.device_class));
        out.push_str(&format!("  device_subclass {:>8}\n", self.device_subclass));
        out.push_str(&format!("  device_protocol {:>8}\n", self.device_protocol));
        out.push_str(&format!("  vendor_id {:>14x}\n", self.vendor_id));
        out.push_str(&format!("  product_id {:>13x}\n", self.product_id));
        out.push_str(&format!("  device_version {:>9}\n", self.device_version.to_string()));
        out.push_str(&format!("  configurations {:>9}\n", self.num_configurations));
        out
    }
}
