//! The `run` and `solid` commands: open the keyboard and drive it.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use hidapi::HidApi;
use tracing::debug;

use ducky_keyboard::ducky::{
    open_ducky_one2, DUCKY_ONE2, DUCKY_ONE2_EXIT_TRAFFIC, DUCKY_ONE2_INIT_TRAFFIC,
};
use ducky_keyboard::{RgbKeyboard, EXIT_TRAFFIC, INIT_TRAFFIC};
use ducky_lighting::{Color, Config};

use crate::configs::{FlameStarlightConfig, SolidConfig};

/// Run a built-in configuration by name.
pub async fn with_named_config(
    name: &str,
    init_traffic: Option<&Path>,
    exit_traffic: Option<&Path>,
) -> anyhow::Result<()> {
    match name {
        "flame" => {
            let config = FlameStarlightConfig::new()?;
            with_config(&config, init_traffic, exit_traffic).await
        }
        other => bail!("unknown configuration: {other} (available: flame)"),
    }
}

/// Run the solid-color configuration.
pub async fn solid(
    r: u8,
    g: u8,
    b: u8,
    init_traffic: Option<&Path>,
    exit_traffic: Option<&Path>,
) -> anyhow::Result<()> {
    let config = SolidConfig::new(Color::new(r as i32, g as i32, b as i32));
    with_config(&config, init_traffic, exit_traffic).await
}

/// Open the keyboard, load handshake traffic, apply `config`, and run
/// until Ctrl-C or an error.
pub async fn with_config(
    config: &dyn Config,
    init_traffic: Option<&Path>,
    exit_traffic: Option<&Path>,
) -> anyhow::Result<()> {
    let api = HidApi::new().context("initializing hidapi")?;
    let transport = Arc::new(open_ducky_one2(&api)?);
    let mut keyboard = RgbKeyboard::new(transport, &DUCKY_ONE2);

    load_traffic(
        &mut keyboard,
        INIT_TRAFFIC,
        init_traffic,
        DUCKY_ONE2_INIT_TRAFFIC,
    )?;
    load_traffic(
        &mut keyboard,
        EXIT_TRAFFIC,
        exit_traffic,
        DUCKY_ONE2_EXIT_TRAFFIC,
    )?;

    keyboard.set_config(config);
    keyboard.run().await?;
    Ok(())
}

/// Load a handshake stream: an explicit path must exist, the bundled
/// default is optional.
fn load_traffic(
    keyboard: &mut RgbKeyboard,
    name: &str,
    explicit: Option<&Path>,
    default: &str,
) -> anyhow::Result<()> {
    match explicit {
        Some(path) => keyboard
            .load_traffic(name, path)
            .with_context(|| format!("loading {name} traffic from {}", path.display())),
        None => {
            let path = Path::new(default);
            if path.exists() {
                keyboard
                    .load_traffic(name, path)
                    .with_context(|| format!("loading bundled {name} traffic"))
            } else {
                debug!(name, "no prepared traffic file, skipping handshake");
                Ok(())
            }
        }
    }
}
