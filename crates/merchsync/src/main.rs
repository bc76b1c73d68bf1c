// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! merchsync - connects an e-commerce storefront to a Mailchimp account.
//!
//! This is the binary entry point for the merchsync service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod serve;
mod status;
mod worker;

/// merchsync - connects an e-commerce storefront to a Mailchimp account.
#[derive(Parser, Debug)]
#[command(name = "merchsync", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit config file (skips the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the admin gateway and the background sync worker.
    Serve,
    /// Show service and sync status.
    Status {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Restart the background sync from scratch.
    Sync,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = {
        let loaded = match &cli.config {
            Some(path) => merchsync_config::load_and_validate_path(path),
            None => merchsync_config::load_and_validate(),
        };
        match loaded {
            Ok(config) => config,
            Err(errors) => {
                merchsync_config::render_errors(&errors);
                std::process::exit(1);
            }
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        Some(Commands::Sync) => serve::run_sync_restart(config).await,
        None => {
            println!("merchsync: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
