//! HID interface selection.
//!
//! A keyboard exposes several HID interfaces; the lighting endpoint is
//! identified by the full (vid, pid, usage, usage page) quadruple.
//! Selection must match exactly one interface — a missing device is a
//! startup error, not something to poll for.

use hidapi::{DeviceInfo, HidApi};
use tracing::{debug, info};

use crate::error::TransportError;
use crate::hid::HidTransport;
use crate::types::TransportDeviceInfo;

/// Selects one HID interface by vendor/product/usage identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HidSelector {
    pub vid: u16,
    pub pid: u16,
    pub usage: u16,
    pub usage_page: u16,
}

impl HidSelector {
    pub const fn new(vid: u16, pid: u16, usage: u16, usage_page: u16) -> Self {
        Self {
            vid,
            pid,
            usage,
            usage_page,
        }
    }

    /// Check if an enumerated interface matches this selector.
    pub fn matches(&self, info: &DeviceInfo) -> bool {
        info.vendor_id() == self.vid
            && info.product_id() == self.pid
            && info.usage() == self.usage
            && info.usage_page() == self.usage_page
    }

    /// Open the first matching interface.
    pub fn open(&self, api: &HidApi) -> Result<HidTransport, TransportError> {
        let matched = api.device_list().find(|info| self.matches(info));
        let Some(matched) = matched else {
            return Err(TransportError::DeviceNotFound(format!(
                "{:04x}:{:04x} usage {:02x} page {:04x}",
                self.vid, self.pid, self.usage, self.usage_page
            )));
        };

        debug!(path = ?matched.path(), "opening HID interface");
        let device = matched.open_device(api)?;
        let info = TransportDeviceInfo {
            vid: self.vid,
            pid: self.pid,
            usage: self.usage,
            usage_page: self.usage_page,
            product: matched.product_string().map(str::to_string),
            path: matched.path().to_str().ok().map(str::to_string),
        };
        info!(device = %info, "opened HID device");
        Ok(HidTransport::new(device, info))
    }
}
