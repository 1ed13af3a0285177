//! The per-device orchestration loop.
//!
//! An [`RgbKeyboard`] ties one transport, one packet sender, one color
//! manager, and one layer stack together and drives the
//! compose → encode → execute cycle. Each cycle runs to completion
//! before an interrupt is honored, and the close sequence always runs
//! before [`RgbKeyboard::run`] returns.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{error, info, warn};

use ducky_lighting::{
    Clock, CombineType, CombiningScheme, Config, EventBus, HookId, LightingScheme, Mask,
};
use ducky_transport::{PacketSender, Transport};

use crate::color_manager::{DeviceLayout, KeyColorManager};
use crate::error::KeyboardError;

/// Prepared-traffic name replayed by `init_connection`.
pub const INIT_TRAFFIC: &str = "initialize";
/// Prepared-traffic name replayed by `close_connection`.
pub const EXIT_TRAFFIC: &str = "exit";

/// Pause after the init handshake before color traffic starts.
const INIT_SETTLE: Duration = Duration::from_secs(2);

/// One RGB keyboard session: transport, encoder, and layer stack.
///
/// Nothing here is shared between sessions — one transport, one
/// manager, one scheme per instance.
pub struct RgbKeyboard {
    sender: PacketSender,
    manager: KeyColorManager,
    scheme: CombiningScheme,
    bus: Arc<EventBus>,
    clock: Clock,
    /// Hook registrations per layer, keyed by scheme address.
    layer_hooks: Vec<(usize, Vec<HookId>)>,
    initialized: bool,
}

impl RgbKeyboard {
    pub fn new(transport: Arc<dyn Transport>, layout: &'static DeviceLayout) -> Self {
        let clock = Clock::new();
        Self {
            sender: PacketSender::new(transport),
            manager: KeyColorManager::new(layout),
            scheme: CombiningScheme::new(),
            bus: Arc::new(EventBus::new(clock)),
            clock,
            layer_hooks: Vec::new(),
            initialized: false,
        }
    }

    /// The bus the embedder's input hook should dispatch key events to.
    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.bus)
    }

    pub fn sender(&self) -> &PacketSender {
        &self.sender
    }

    pub fn sender_mut(&mut self) -> &mut PacketSender {
        &mut self.sender
    }

    pub fn color_manager(&self) -> &KeyColorManager {
        &self.manager
    }

    /// Load a prepared-traffic file under a name (`INIT_TRAFFIC`,
    /// `EXIT_TRAFFIC`, or custom).
    pub fn load_traffic(
        &mut self,
        name: &str,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), KeyboardError> {
        self.sender.load_traffic(name, path)?;
        Ok(())
    }

    /// Append a lighting layer and register its reactive hooks.
    pub fn add_layer(&mut self, scheme: Arc<LightingScheme>, combine: CombineType, mask: Mask) {
        let hooks = self.bus.add_hooks(scheme.hooks());
        self.layer_hooks
            .push((Arc::as_ptr(&scheme) as usize, hooks));
        self.scheme.add_scheme(scheme, combine, mask);
    }

    /// Remove a layer by scheme identity, unregistering its hooks.
    pub fn remove_layer(&mut self, scheme: &Arc<LightingScheme>) {
        let address = Arc::as_ptr(scheme) as usize;
        let mut removed = Vec::new();
        self.layer_hooks.retain(|(layer, hooks)| {
            if *layer == address {
                removed.extend_from_slice(hooks);
                false
            } else {
                true
            }
        });
        self.bus.remove_hooks(&removed);
        self.scheme.remove_scheme(scheme);
    }

    /// Drop every layer and its hooks.
    pub fn reset_layers(&mut self) {
        let all: Vec<HookId> = self
            .layer_hooks
            .drain(..)
            .flat_map(|(_, hooks)| hooks)
            .collect();
        self.bus.remove_hooks(&all);
        self.scheme.clear_schemes();
    }

    /// Replace the layer stack with a config's declared layers, in
    /// their declared order.
    pub fn set_config(&mut self, config: &dyn Config) {
        self.reset_layers();
        for layer in config.layers() {
            self.add_layer(layer.scheme, layer.combine, layer.mask);
        }
    }

    /// Replay the init handshake (when loaded) and enable `push`.
    pub async fn init_connection(&mut self) -> Result<(), KeyboardError> {
        info!("initializing connection");
        if self.sender.prepared(INIT_TRAFFIC).is_some() {
            let (ok, failed) = self.sender.execute_prepared(INIT_TRAFFIC).await?;
            info!(ok, failed, "replayed init traffic");
            // Let the controller switch modes before color traffic
            tokio::time::sleep(INIT_SETTLE).await;
        }
        self.initialized = true;
        Ok(())
    }

    /// Replay the exit handshake (when loaded) and disable `push`.
    pub async fn close_connection(&mut self) -> Result<(), KeyboardError> {
        info!("closing connection");
        self.initialized = false;
        if self.sender.prepared(EXIT_TRAFFIC).is_some() {
            let (ok, failed) = self.sender.execute_prepared(EXIT_TRAFFIC).await?;
            info!(ok, failed, "replayed exit traffic");
        }
        Ok(())
    }

    /// One compose → encode → execute cycle over `mask`.
    ///
    /// Fails fast before `init_connection` has run.
    pub async fn push(&mut self, mask: &Mask) -> Result<(), KeyboardError> {
        if !self.initialized {
            return Err(KeyboardError::NotInitialized);
        }
        let now = self.clock.now();
        self.manager.apply_scheme(&self.scheme, mask, now)?;
        let stream = self.manager.packets_to_send();
        self.sender.execute_packet_stream(&stream).await?;
        Ok(())
    }

    /// Drive the keyboard until Ctrl-C or an error, then run the close
    /// sequence.
    pub async fn run(&mut self) -> Result<(), KeyboardError> {
        let result = self.drive().await;
        if let Err(error) = &result {
            error!(%error, "main loop ended with error");
        }
        if let Err(close_error) = self.close_connection().await {
            warn!(%close_error, "close sequence failed");
            return result.and(Err(close_error));
        }
        result
    }

    async fn drive(&mut self) -> Result<(), KeyboardError> {
        self.init_connection().await?;
        let mut interrupt = std::pin::pin!(tokio::signal::ctrl_c());
        loop {
            // Complete the in-flight cycle before honoring an interrupt
            self.push(&Mask::all()).await?;
            if (&mut interrupt).now_or_never().is_some() {
                info!("interrupt received, shutting down");
                return Ok(());
            }
        }
    }
}
