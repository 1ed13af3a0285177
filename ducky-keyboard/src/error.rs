//! Keyboard interface error types

use ducky_transport::TransportError;
use thiserror::Error;

/// Errors from keyboard operations
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// `push` was called before the connection was initialized
    #[error("Keyboard connection not initialized")]
    NotInitialized,

    /// A key name outside the device's layout table
    #[error("Unknown key: {0}")]
    UnknownKey(String),
}
