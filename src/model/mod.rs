//! USB topology node and descriptor types.

pub mod bus;
pub mod descriptor;
pub mod device;

pub use bus::BusNode;
pub use descriptor::{BcdVersion, DeviceDescriptor};
pub use device::{DeviceNode, MAX_DEVICE_TIERS};

/// Prefix every line of a dump block with two spaces.
///
/// Blocks always end with a trailing newline, which is preserved.
pub(crate) fn indent_block(block: &str) -> String {
    let mut out = String::with_capacity(block.len() + 32);
    for line in block.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}
