//! The `replay` command: execute a traffic file against the keyboard.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use hidapi::HidApi;

use ducky_keyboard::ducky::open_ducky_one2;
use ducky_transport::{PacketSender, PacketStream};

/// Replay a prepared-traffic file and report the outcome.
pub async fn replay(file: &Path) -> anyhow::Result<()> {
    let stream = PacketStream::from_file(file)
        .with_context(|| format!("loading traffic from {}", file.display()))?;
    println!("{} packets in {}", stream.len(), file.display());

    let api = HidApi::new().context("initializing hidapi")?;
    let transport = Arc::new(open_ducky_one2(&api)?);
    let sender = PacketSender::new(transport);

    let (successes, failures) = sender.execute_packet_stream(&stream).await?;
    println!("{successes} succeeded, {failures} failed");
    Ok(())
}
