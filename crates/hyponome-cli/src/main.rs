//! hyponome unified CLI.
//!
//! A minimal remote hashing service.
//!
//! # Quick Start
//!
//! ```bash
//! # Start the server (default port 5923)
//! hyponome serve 127.0.0.1
//!
//! # Hash a payload remotely (new terminal)
//! hyponome hash 127.0.0.1 'This is a test file.'
//! ```

mod commands;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

/// hyponome - a remote hashing service.
#[derive(Parser)]
#[command(name = "hyponome")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Start the hasher service and serve forever.
    Serve {
        /// Address to bind to (host[:port]; default port 5923).
        address: String,
    },

    /// Hash a payload on a remote server and print the hex digest.
    Hash {
        /// Server address (host[:port]; default port 5923).
        server: String,

        /// Payload string; its bytes are hashed verbatim.
        input: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Usage errors exit with 1, like every other failure; clap's
    // default is 2.
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        let code = match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => 1,
        };
        let _ = err.print();
        std::process::exit(code);
    });

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Serve { address } => commands::serve::run(&address),
        Commands::Hash { server, input } => commands::hash::run(&server, &input),
    }
}
