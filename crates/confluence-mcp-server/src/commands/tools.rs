//! Tools command - lists the available tools.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde_json::json;

use confluence_client::ConfluenceClient;

use super::{Context, registry};

/// Arguments for the tools command.
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Print the full tool definitions, including input schemas, as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the tools command.
///
/// Needs no configuration: the tools are listed against a placeholder client
/// that is never called.
pub async fn run(args: ToolsArgs, _ctx: &Context) -> Result<()> {
    let client = ConfluenceClient::builder()
        .base_url("http://localhost")
        .token("unused")
        .build()?;
    let tools = registry(client).list();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json!({ "tools": tools }))?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("Confluence MCP Tools").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    for tool in &tools {
        println!("  {:<26} {}", style(&tool.name).cyan(), tool.description);
    }
    println!();
    Ok(())
}
