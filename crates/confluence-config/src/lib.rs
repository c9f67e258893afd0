//! Connection configuration for the Confluence MCP adapter.
//!
//! Resolves the Confluence base URL, personal access token and request
//! timeout from (lowest precedence first):
//! - a TOML config file (`[confluence]` table)
//! - a `.env` file, loaded into the process environment
//! - environment variables (`CONFLUENCE_URL`, `CONFLUENCE_PERSONAL_ACCESS_TOKEN`,
//!   `CONFLUENCE_TIMEOUT_SECS`)
//!
//! Missing or empty URL/token values are a fatal configuration error.

pub mod connection;
pub mod discovery;
pub mod error;
pub mod secrets;

pub use connection::{
    ConnectionConfig, DEFAULT_TIMEOUT_SECS, TIMEOUT_ENV, TOKEN_ENV, URL_ENV,
};
pub use discovery::{
    ConfigFile, ConfluenceSection, discover_config_file, load_config_file, load_dotenv,
    xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use secrets::{ResolvedSecret, SecretSource};
