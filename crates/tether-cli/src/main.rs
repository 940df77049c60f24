//! Tether CLI - person CRUD against a backend over the IPC bridge.
//!
//! Connects to the backend's IPC server and runs one controller operation
//! per invocation.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::PersonCommand;
use std::net::SocketAddr;
use std::sync::Arc;
use tether_core::config::IpcConfig;
use tether_core::{IpcClient, PersonController};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(about = "Typed CRUD client for a Tether backend")]
struct Args {
    /// Backend IPC address
    #[arg(long, global = true, env = "TETHER_ADDR", default_value = IpcConfig::DEFAULT_ADDR)]
    addr: SocketAddr,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Person records
    Person {
        #[command(subcommand)]
        action: PersonCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Warnings only unless asked, so command output stays readable
    let log_level = if args.debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    debug!("Connecting to backend at {}", args.addr);

    let client = IpcClient::connect(args.addr)
        .await
        .with_context(|| format!("Failed to connect to backend at {}", args.addr))?;

    let output = match args.command {
        Command::Person { action } => {
            let persons = PersonController::new(Arc::new(client));
            commands::run(&persons, action, args.json).await?
        }
    };

    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
