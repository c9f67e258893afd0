//! Serve command - MCP over stdio.

use anyhow::{Context as _, Result};
use clap::Args;

use confluence_mcp::McpServer;

use super::{Context, registry};

/// Arguments for the serve command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Skip the connection check at startup
    #[arg(long)]
    pub no_check: bool,
}

/// Run the serve command.
pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    tracing::info!("initializing Confluence client");
    let client = if args.no_check {
        ctx.client()?
    } else {
        ctx.connect().await?
    };
    tracing::info!("Confluence MCP server initialization successful");

    let server = McpServer::new(registry(client));
    server
        .serve_stdio()
        .await
        .context("MCP server stopped with an error")
}
