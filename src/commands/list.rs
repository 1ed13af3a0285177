//! The `list` command: enumerate visible HID interfaces.

use anyhow::Context;
use hidapi::HidApi;

use ducky_keyboard::ducky::DUCKY_ONE2_SELECTOR;

/// Print every HID interface, flagging the Ducky lighting endpoint.
pub fn list() -> anyhow::Result<()> {
    let api = HidApi::new().context("initializing hidapi")?;

    for info in api.device_list() {
        let marker = if DUCKY_ONE2_SELECTOR.matches(info) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:04x}:{:04x} usage {:04x} page {:04x}  {}",
            info.vendor_id(),
            info.product_id(),
            info.usage(),
            info.usage_page(),
            info.product_string().unwrap_or("?"),
        );
    }
    Ok(())
}
