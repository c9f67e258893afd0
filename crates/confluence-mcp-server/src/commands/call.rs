//! Call command - invokes one tool and prints the result.

use anyhow::{Context as _, Result, bail};
use clap::Args;
use serde_json::Value;

use confluence_mcp::McpServer;

use super::{Context, registry};

/// Arguments for the call command.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// Tool name, e.g. get_spaces
    pub tool: String,

    /// Tool arguments as a JSON object
    #[arg(long, default_value = "{}")]
    pub args: String,
}

/// Run the call command.
pub async fn run(args: CallArgs, ctx: &Context) -> Result<()> {
    let arguments: Value =
        serde_json::from_str(&args.args).context("--args must be a JSON object")?;
    if !arguments.is_object() {
        bail!("--args must be a JSON object");
    }

    let server = McpServer::new(registry(ctx.connect().await?));
    let result = server.call_tool(&args.tool, arguments).await?;

    if result.is_error() {
        bail!("{}", result.text());
    }
    println!("{}", result.text());
    Ok(())
}
