//! CLI definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ducky_driver", about = "Per-key RGB lighting driver for Ducky keyboards", version)]
pub struct Cli {
    /// Log level filter (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    pub loglevel: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive the keyboard with a built-in lighting configuration
    Run {
        /// Configuration name
        #[arg(long, default_value = "flame")]
        config: String,

        /// Init handshake traffic file (defaults to the bundled capture)
        #[arg(long)]
        init_traffic: Option<PathBuf>,

        /// Exit handshake traffic file (defaults to the bundled capture)
        #[arg(long)]
        exit_traffic: Option<PathBuf>,
    },

    /// Light every key with one color
    Solid {
        r: u8,
        g: u8,
        b: u8,

        #[arg(long)]
        init_traffic: Option<PathBuf>,

        #[arg(long)]
        exit_traffic: Option<PathBuf>,
    },

    /// List HID interfaces visible to the driver
    List,

    /// Execute a prepared-traffic file against the keyboard
    Replay {
        /// Traffic file (one `<I|O> <hex>` packet per line)
        file: PathBuf,
    },
}
