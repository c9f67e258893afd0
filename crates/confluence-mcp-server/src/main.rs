//! Confluence MCP server
//!
//! Main entry point: serves Confluence content tools over MCP stdio, and
//! offers a connection check and one-shot tool calls for debugging.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{call, check, serve, tools};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Confluence MCP server - Confluence content as MCP tools
#[derive(Parser)]
#[command(name = "confluence-mcp-server")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: user config, then ./confluence-mcp.toml)
    #[arg(long, global = true, env = "CONFLUENCE_MCP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Env file to load (default: .env if present)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Also write JSON logs to a daily-rotated file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve MCP on stdin/stdout (default)
    Serve(serve::ServeArgs),

    /// Test the connection to Confluence
    Check(check::CheckArgs),

    /// Call one tool and print its result
    Call(call::CallArgs),

    /// List the available tools
    Tools(tools::ToolsArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

const LOG_TARGETS: [&str; 5] = [
    "confluence_mcp_server",
    "confluence_mcp",
    "confluence_content",
    "confluence_client",
    "confluence_config",
];

fn default_filter(level: &str) -> String {
    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

/// Console logging goes to stderr; stdout carries the protocol.
fn init_logging(verbose: bool, log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    use tracing_subscriber::prelude::*;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(if verbose { "debug" } else { "info" })));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "confluence-mcp.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new(default_filter("trace")));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .with(file_layer)
        .init();

    guard
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_dir.as_ref());

    let ctx = commands::Context {
        config_path: cli.config,
        env_file: cli.env_file,
    };

    match cli.command {
        None => serve::run(serve::ServeArgs::default(), &ctx).await,
        Some(Commands::Serve(args)) => serve::run(args, &ctx).await,
        Some(Commands::Check(args)) => check::run(args, &ctx).await,
        Some(Commands::Call(args)) => call::run(args, &ctx).await,
        Some(Commands::Tools(args)) => tools::run(args, &ctx).await,
    }
}
