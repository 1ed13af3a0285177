//! Ducky RGB Driver CLI
//!
//! Drives per-key RGB lighting on a Ducky keyboard over its vendor HID
//! interface.

use clap::Parser;

use ducky_driver::cli::{Cli, Commands};
use ducky_driver::commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                cli.loglevel
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid log level {:?}: {e}", cli.loglevel))?,
            ),
        )
        .init();

    match cli.command {
        None => {
            // Default: drive the flame configuration
            commands::run::with_named_config("flame", None, None).await?;
        }
        Some(Commands::Run {
            config,
            init_traffic,
            exit_traffic,
        }) => {
            commands::run::with_named_config(
                &config,
                init_traffic.as_deref(),
                exit_traffic.as_deref(),
            )
            .await?;
        }
        Some(Commands::Solid {
            r,
            g,
            b,
            init_traffic,
            exit_traffic,
        }) => {
            commands::run::solid(r, g, b, init_traffic.as_deref(), exit_traffic.as_deref())
                .await?;
        }
        Some(Commands::List) => {
            commands::list::list()?;
        }
        Some(Commands::Replay { file }) => {
            commands::replay::replay(&file).await?;
        }
    }

    Ok(())
}
