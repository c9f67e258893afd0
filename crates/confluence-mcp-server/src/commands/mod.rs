//! CLI command handlers.

pub mod call;
pub mod check;
pub mod serve;
pub mod tools;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use confluence_client::ConfluenceClient;
use confluence_config::{ConnectionConfig, discover_config_file, load_dotenv};
use confluence_content::ContentManager;
use confluence_mcp::ToolRegistry;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit config file, if given.
    pub config_path: Option<PathBuf>,
    /// Explicit env file, if given.
    pub env_file: Option<PathBuf>,
}

impl Context {
    /// Load `.env` and config files and resolve the connection settings.
    pub fn connection_config(&self) -> Result<ConnectionConfig> {
        load_dotenv(self.env_file.as_deref()).context("failed to load env file")?;

        let (file, loaded) = discover_config_file(self.config_path.as_deref(), None)
            .context("failed to load config file")?;
        for path in &loaded {
            tracing::debug!(path = %path.display(), "using config file");
        }

        let config = ConnectionConfig::from_env(Some(&file))?;
        tracing::debug!(?config, "resolved connection settings");
        Ok(config)
    }

    /// Build a client from the resolved settings without any network call.
    pub fn client(&self) -> Result<ConfluenceClient> {
        let config = self.connection_config()?;
        Ok(builder(&config).build()?)
    }

    /// Build a client and confirm Confluence is reachable.
    pub async fn connect(&self) -> Result<ConfluenceClient> {
        let config = self.connection_config()?;
        connect_with(&config).await
    }
}

/// Build a client from already resolved settings and check reachability.
pub async fn connect_with(config: &ConnectionConfig) -> Result<ConfluenceClient> {
    builder(config)
        .connect()
        .await
        .context("failed to initialize Confluence client")
}

fn builder(config: &ConnectionConfig) -> confluence_client::ClientBuilder {
    ConfluenceClient::builder()
        .base_url(&config.url)
        .token(&config.token)
        .timeout(config.timeout)
}

/// Tool registry bound to a client.
pub fn registry(client: ConfluenceClient) -> ToolRegistry {
    ToolRegistry::with_content_tools(ContentManager::new(Arc::new(client)))
}
