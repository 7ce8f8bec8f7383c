//! Serve command - runs the hasher service.

use anyhow::{Context, Result};
use tracing::info;

use hyponome_server::{Server, ServerConfig};
use hyponome_wire::parse_addr;

pub fn run(address: &str) -> Result<()> {
    let bind_addr =
        parse_addr(address).with_context(|| format!("invalid bind address '{address}'"))?;

    info!("starting hasher service");
    println!();
    println!("hyponome - remote hashing service");
    println!();
    println!("  Bind address: {bind_addr}");
    println!();

    let config = ServerConfig::new(bind_addr);
    let mut server = Server::new(config).context("failed to start server")?;

    println!("Server is ready. Press Ctrl+C to stop.");
    println!();

    server.run().context("server error during operation")?;

    Ok(())
}
