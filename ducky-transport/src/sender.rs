//! Packet stream execution.
//!
//! A [`PacketSender`] replays packet streams against a transport:
//! outbound packets are sent and checked by write count, inbound
//! packets wait for the device's frame and compare it against the
//! expected packet. The protocol is best-effort and non-transactional —
//! a mismatched ack is a counted failure and execution continues, but a
//! transport error aborts the whole stream.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::TransportError;
use crate::packet::{Packet, PacketStream};
use crate::Transport;

/// Executes packet streams against a transport and holds the named
/// prepared-traffic streams (captured init/exit handshakes).
pub struct PacketSender {
    transport: Arc<dyn Transport>,
    prepared: HashMap<String, PacketStream>,
}

impl PacketSender {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            prepared: HashMap::new(),
        }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Load a prepared-traffic file under a name.
    pub fn load_traffic(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), TransportError> {
        let stream = PacketStream::from_file(path)?;
        self.insert_traffic(name, stream);
        Ok(())
    }

    /// Register an already-built stream under a name.
    pub fn insert_traffic(&mut self, name: &str, stream: PacketStream) {
        self.prepared.insert(name.to_string(), stream);
    }

    pub fn prepared(&self, name: &str) -> Option<&PacketStream> {
        self.prepared.get(name)
    }

    /// Execute a named prepared stream.
    pub async fn execute_prepared(&self, name: &str) -> Result<(usize, usize), TransportError> {
        let stream = self
            .prepared
            .get(name)
            .ok_or_else(|| TransportError::UnknownTraffic(name.to_string()))?;
        self.execute_packet_stream(stream).await
    }

    /// Execute a stream in order.
    ///
    /// # Returns
    /// `(successes, failures)` over the stream's packets. A transport
    /// error aborts execution — packets already sent stay applied.
    pub async fn execute_packet_stream(
        &self,
        stream: &PacketStream,
    ) -> Result<(usize, usize), TransportError> {
        let mut successes = 0;
        let mut failures = 0;

        for packet in stream.iter() {
            if self.handle_packet(packet).await? {
                successes += 1;
            } else {
                failures += 1;
            }
        }

        debug!(successes, failures, "executed packet stream");
        Ok((successes, failures))
    }

    /// Send or receive one packet; true on success.
    async fn handle_packet(&self, packet: &Packet) -> Result<bool, TransportError> {
        if packet.outbound {
            let written = self.transport.send(&packet.payload, packet.report_id).await?;
            // The transport's count includes the report-id byte
            Ok(written.saturating_sub(1) == packet.payload.len())
        } else {
            let frame = self.transport.recv(packet.payload.len() + 1).await?;
            let Some((&report_id, payload)) = frame.split_first() else {
                warn!("empty frame while waiting for ack");
                return Ok(false);
            };
            let received = Packet::inbound(payload.to_vec(), report_id);
            if received != *packet {
                warn!(expected = %packet, got = %received, "ack mismatch");
                return Ok(false);
            }
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    fn sender(mock: &Arc<MockTransport>) -> PacketSender {
        PacketSender::new(Arc::clone(mock) as Arc<dyn Transport>)
    }

    #[tokio::test]
    async fn outbound_counts_by_write_length() {
        let mock = Arc::new(MockTransport::new());
        let stream = PacketStream::from_packets(vec![
            Packet::outbound(vec![0x01, 0x02], 1),
            Packet::outbound(vec![0x03], 1),
        ]);

        let (ok, bad) = sender(&mock).execute_packet_stream(&stream).await.unwrap();
        assert_eq!((ok, bad), (2, 0));
        assert_eq!(
            mock.sent(),
            vec![vec![0x01, 0x01, 0x02], vec![0x01, 0x03]]
        );
    }

    #[tokio::test]
    async fn short_write_is_a_failure_not_an_error() {
        let mock = Arc::new(MockTransport::new());
        mock.set_short_writes(true);
        let stream = PacketStream::from_packets(vec![Packet::outbound(vec![0x01, 0x02], 1)]);

        let (ok, bad) = sender(&mock).execute_packet_stream(&stream).await.unwrap();
        assert_eq!((ok, bad), (0, 1));
    }

    #[tokio::test]
    async fn matching_ack_succeeds_mismatch_continues() {
        let mock = Arc::new(MockTransport::new());
        // First ack matches; second has a wrong byte; third packet is
        // outbound and must still be sent after the mismatch.
        mock.push_response({
            let mut frame = vec![0u8; 65];
            frame[0] = 0x01;
            frame
        });
        mock.push_response({
            let mut frame = vec![0u8; 65];
            frame[0] = 0x01;
            frame[10] = 0xff;
            frame
        });
        let zero_ack = Packet::inbound(vec![0u8; 64], 0x01);
        let stream = PacketStream::from_packets(vec![
            zero_ack.clone(),
            zero_ack,
            Packet::outbound(vec![0xaa], 1),
        ]);

        let (ok, bad) = sender(&mock).execute_packet_stream(&stream).await.unwrap();
        assert_eq!((ok, bad), (2, 1));
        assert_eq!(mock.sent().len(), 1);
    }

    #[tokio::test]
    async fn transport_error_aborts_the_stream() {
        let mock = Arc::new(MockTransport::new());
        mock.fail_sends_after(1);
        let stream = PacketStream::from_packets(vec![
            Packet::outbound(vec![0x01], 1),
            Packet::outbound(vec![0x02], 1),
            Packet::outbound(vec![0x03], 1),
        ]);

        let result = sender(&mock).execute_packet_stream(&stream).await;
        assert!(matches!(result, Err(TransportError::Disconnected)));
        // The first packet was already applied when the stream died
        assert_eq!(mock.sent().len(), 1);
    }

    #[tokio::test]
    async fn prepared_traffic_by_name() {
        let mock = Arc::new(MockTransport::new());
        let mut sender = sender(&mock);
        sender.insert_traffic(
            "initialize",
            PacketStream::parse_str("O 014101\nO 014102\n"),
        );

        let (ok, bad) = sender.execute_prepared("initialize").await.unwrap();
        assert_eq!((ok, bad), (2, 0));

        let missing = sender.execute_prepared("exit").await;
        assert!(matches!(missing, Err(TransportError::UnknownTraffic(_))));
    }
}
