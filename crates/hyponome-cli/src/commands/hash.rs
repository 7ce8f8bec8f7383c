//! Hash command - one remote hash request, hex digest on stdout.

use anyhow::{Context, Result};

use hyponome_client::{Client, ClientConfig};

pub fn run(server: &str, input: &str) -> Result<()> {
    let mut client = Client::connect(server, ClientConfig::default())
        .with_context(|| format!("failed to connect to {server}"))?;

    let digest = client
        .hash_hex(input.as_bytes())
        .context("hash request failed")?;

    println!("{digest}");
    Ok(())
}
