// Ducky per-key RGB driver - shared library
// CLI definitions, command handlers, and the built-in lighting configs

pub mod cli;
pub mod commands;
pub mod configs;

pub use configs::{FlameStarlightConfig, SolidConfig};
