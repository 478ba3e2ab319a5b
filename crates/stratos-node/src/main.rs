//! # Stratos Node
//!
//! Main entry point for the Stratos node server.

use stratos_node::{init_tracing, run_server, NodeConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let config = NodeConfig::from_env();
    run_server(config).await
}
