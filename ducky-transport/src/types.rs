//! Shared transport types

use std::fmt;

/// Identity of the HID interface a transport is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportDeviceInfo {
    pub vid: u16,
    pub pid: u16,
    pub usage: u16,
    pub usage_page: u16,
    /// Product string reported by the device, when available.
    pub product: Option<String>,
    /// OS path of the opened interface, when available.
    pub path: Option<String>,
}

impl fmt::Display for TransportDeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}:{:04x} usage {:02x} page {:04x}",
            self.vid, self.pid, self.usage, self.usage_page
        )?;
        if let Some(product) = &self.product {
            write!(f, " ({product})")?;
        }
        Ok(())
    }
}
