//! HID transport and packet protocol for Ducky RGB keyboards.
//!
//! This crate owns the wire side of the driver:
//!
//! - [`Packet`] / [`PacketStream`] — the binary frame model and the
//!   text format used for canned (captured) traffic
//! - [`Transport`] — send/receive primitives over an opened HID device
//! - [`HidSelector`] / [`HidTransport`] — hidapi-backed device open by
//!   (vid, pid, usage, usage page)
//! - [`PacketSender`] — executes packet streams against a transport,
//!   matching inbound acks and counting success/failure
//! - [`MockTransport`] — in-memory transport for tests

pub mod error;
pub mod packet;
pub mod sender;
pub mod types;

mod discovery;
mod hid;
pub mod mock;

pub use discovery::HidSelector;
pub use error::{PacketError, TransportError};
pub use hid::HidTransport;
pub use mock::MockTransport;
pub use packet::{Packet, PacketStream};
pub use sender::PacketSender;
pub use types::TransportDeviceInfo;

use std::sync::Arc;

use async_trait::async_trait;

/// Default read length for a full report frame (report id + payload).
pub const DEFAULT_RECV_LEN: usize = 64;

/// Send/receive primitives over an opened HID device.
///
/// Implementations surface device I/O as async even when the
/// underlying calls block; callers treat each call as a suspension
/// point and never overlap two calls for the same device.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one report.
    ///
    /// # Arguments
    /// * `payload` - report payload, without the report id
    /// * `report_id` - report id prepended at the transport boundary
    ///
    /// # Returns
    /// Bytes written, including the report-id byte. Failures are
    /// logged and propagated — never retried here.
    async fn send(&self, payload: &[u8], report_id: u8) -> Result<usize, TransportError>;

    /// Wait for a frame from the device.
    ///
    /// # Arguments
    /// * `length` - how many bytes to read (report id + payload)
    ///
    /// There is no timeout: a device that never responds stalls the
    /// caller's cycle.
    async fn recv(&self, length: usize) -> Result<Vec<u8>, TransportError>;

    /// Identity of the bound HID interface.
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Check whether the device is still reachable.
    async fn is_connected(&self) -> bool;

    /// Close the transport gracefully.
    async fn close(&self) -> Result<(), TransportError>;
}

/// Type alias for a shared boxed transport
pub type BoxedTransport = Arc<dyn Transport>;
