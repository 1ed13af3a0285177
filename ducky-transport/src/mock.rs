//! In-memory transport for tests.
//!
//! Records every sent frame, serves scripted responses, and injects
//! failures on demand. With no scripted responses queued, `recv`
//! returns a zero-filled frame tagged with report id 1 — the ack shape
//! the keyboard protocol expects — so happy-path pipelines run without
//! scripting every ack.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::TransportError;
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// Scriptable in-memory transport.
pub struct MockTransport {
    info: TransportDeviceInfo,
    sent: Mutex<Vec<Vec<u8>>>,
    responses: Mutex<VecDeque<Vec<u8>>>,
    short_writes: AtomicBool,
    /// Sends remaining before forced failure; usize::MAX = never fail.
    sends_before_failure: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            info: TransportDeviceInfo {
                product: Some("mock".to_string()),
                ..Default::default()
            },
            sent: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            short_writes: AtomicBool::new(false),
            sends_before_failure: AtomicUsize::new(usize::MAX),
        }
    }

    /// Frames sent so far, each including the report-id byte.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }

    /// Queue a frame to be returned by the next `recv`.
    pub fn push_response(&self, frame: Vec<u8>) {
        self.responses.lock().push_back(frame);
    }

    /// Make `send` report one byte fewer than it wrote.
    pub fn set_short_writes(&self, short: bool) {
        self.short_writes.store(short, Ordering::SeqCst);
    }

    /// Let `count` sends succeed, then fail every later send.
    pub fn fail_sends_after(&self, count: usize) {
        self.sends_before_failure.store(count, Ordering::SeqCst);
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, payload: &[u8], report_id: u8) -> Result<usize, TransportError> {
        let remaining = self.sends_before_failure.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err(TransportError::Disconnected);
        }
        if remaining != usize::MAX {
            self.sends_before_failure.store(remaining - 1, Ordering::SeqCst);
        }

        let mut frame = Vec::with_capacity(payload.len() + 1);
        frame.push(report_id);
        frame.extend_from_slice(payload);
        let written = frame.len();
        self.sent.lock().push(frame);

        if self.short_writes.load(Ordering::SeqCst) {
            Ok(written - 1)
        } else {
            Ok(written)
        }
    }

    async fn recv(&self, length: usize) -> Result<Vec<u8>, TransportError> {
        if let Some(frame) = self.responses.lock().pop_front() {
            return Ok(frame);
        }
        // Default ack: report id 1, zero payload
        let mut frame = vec![0u8; length];
        if let Some(first) = frame.first_mut() {
            *first = 0x01;
        }
        Ok(frame)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    async fn is_connected(&self) -> bool {
        true
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
