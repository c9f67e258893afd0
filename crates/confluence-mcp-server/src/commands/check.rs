//! Check command - tests the connection to Confluence.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde_json::Value;

use super::{Context, connect_with};

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Number of spaces to list once connected
    #[arg(long, default_value_t = 5)]
    pub spaces: u32,
}

/// Run the check command.
pub async fn run(args: CheckArgs, ctx: &Context) -> Result<()> {
    let config = ctx.connection_config()?;
    let green = Style::new().green();
    let red = Style::new().red();
    let dim = Style::new().dim();

    println!();
    println!("{}", style("Confluence Connection Test").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    println!("  {} {}", dim.apply_to("URL:"), config.url);
    println!("  {} {}", dim.apply_to("Token:"), config.token_source);

    let client = match connect_with(&config).await {
        Ok(client) => {
            println!("  {} {}", dim.apply_to("Status:"), green.apply_to("● connected"));
            client
        }
        Err(e) => {
            println!("  {} {}", dim.apply_to("Status:"), red.apply_to("● failed"));
            println!();
            return Err(e);
        }
    };

    let spaces = client.spaces().list(0, args.spaces).await?;
    let results = spaces
        .get("results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    println!();
    println!("  {} ({})", style("Spaces").bold(), results.len());
    for space in &results {
        let name = space.get("name").and_then(Value::as_str).unwrap_or("?");
        let key = space.get("key").and_then(Value::as_str).unwrap_or("?");
        println!("    {} {}", name, dim.apply_to(format!("({})", key)));
    }
    println!();
    Ok(())
}
