//! High-level RGB keyboard interface on top of the transport layer.
//!
//! This crate owns the device-facing half of the driver:
//!
//! - [`KeyColorManager`] — per-key color state and the device packet
//!   encoder (headers, offsets, and the spill stride reproduced from
//!   captured traffic)
//! - [`DeviceLayout`] — the per-device constant key table
//! - [`ducky`] — Ducky One 2 RGB device data and open helper
//! - [`RgbKeyboard`] — the compose → encode → execute orchestration
//!   loop with graceful init/close handshakes

pub mod color_manager;
pub mod ducky;
pub mod error;
pub mod keyboard;

pub use color_manager::{
    DeviceLayout, KeyColorManager, KeyData, REPORT_PAYLOAD_LEN, SPILL_STRIDE,
};
pub use error::KeyboardError;
pub use keyboard::{RgbKeyboard, EXIT_TRAFFIC, INIT_TRAFFIC};
