//! hidapi-backed transport.

use async_trait::async_trait;
use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::error::TransportError;
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// Transport over an opened HID device.
///
/// hidapi calls are blocking; the device handle sits behind a mutex so
/// a send and a receive can never interleave on the wire.
pub struct HidTransport {
    device: Mutex<HidDevice>,
    info: TransportDeviceInfo,
}

impl HidTransport {
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            device: Mutex::new(device),
            info,
        }
    }
}

#[async_trait]
impl Transport for HidTransport {
    async fn send(&self, payload: &[u8], report_id: u8) -> Result<usize, TransportError> {
        let mut frame = Vec::with_capacity(payload.len() + 1);
        frame.push(report_id);
        frame.extend_from_slice(payload);

        let device = self.device.lock();
        match device.write(&frame) {
            Ok(written) => {
                debug!(written, report_id, "sent report");
                Ok(written)
            }
            Err(e) => {
                error!(report_id, len = payload.len(), %e, "error sending packet");
                Err(e.into())
            }
        }
    }

    async fn recv(&self, length: usize) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; length];
        let device = self.device.lock();
        // Blocking read, no timeout: a silent device stalls this cycle
        let read = device.read(&mut buf)?;
        buf.truncate(read);
        debug!(read, "received report");
        Ok(buf)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    async fn is_connected(&self) -> bool {
        self.device.lock().get_product_string().is_ok()
    }

    async fn close(&self) -> Result<(), TransportError> {
        // HidDevice closes on drop
        Ok(())
    }
}
