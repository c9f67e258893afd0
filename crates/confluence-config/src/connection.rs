//! Resolved connection settings.

use std::time::Duration;

use crate::secrets::{ResolvedSecret, SecretSource, resolve_secret};
use crate::{ConfigError, ConfigFile, Result};

/// Environment variable holding the Confluence base URL.
pub const URL_ENV: &str = "CONFLUENCE_URL";

/// Environment variable holding the personal access token.
pub const TOKEN_ENV: &str = "CONFLUENCE_PERSONAL_ACCESS_TOKEN";

/// Environment variable overriding the request timeout.
pub const TIMEOUT_ENV: &str = "CONFLUENCE_TIMEOUT_SECS";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything needed to open a connection to Confluence.
///
/// Both `url` and `token` are guaranteed non-empty.
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Base URL of the Confluence instance.
    pub url: String,
    /// Personal access token.
    pub token: String,
    /// Where the token came from.
    pub token_source: SecretSource,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("token_source", &self.token_source)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ConnectionConfig {
    /// Resolve from the process environment and an optional config file.
    pub fn from_env(file: Option<&ConfigFile>) -> Result<Self> {
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Resolve using an arbitrary environment lookup.
    ///
    /// Environment values override file values; empty strings count as unset.
    pub fn resolve<F>(file: Option<&ConfigFile>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = file.map(|f| &f.confluence);

        let url = lookup(URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                section
                    .and_then(|s| s.url.clone())
                    .filter(|v| !v.trim().is_empty())
            })
            .ok_or_else(|| ConfigError::missing("url", URL_ENV))?;

        let ResolvedSecret {
            value: token,
            source: token_source,
        } = resolve_secret(TOKEN_ENV, &lookup, section.and_then(|s| s.token.as_deref()))
            .ok_or_else(|| ConfigError::missing("token", TOKEN_ENV))?;

        if token_source.is_plaintext() {
            tracing::warn!("personal access token read from config file; prefer {}", TOKEN_ENV);
        }

        let timeout_secs = match lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    field: TIMEOUT_ENV.to_string(),
                    value: raw.clone(),
                })?,
            None => section
                .and_then(|s| s.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            url: url.trim().to_string(),
            token,
            token_source,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_from_env() {
        let config = ConnectionConfig::resolve(
            None,
            env(&[(URL_ENV, "https://wiki.example.com"), (TOKEN_ENV, "pat")]),
        )
        .unwrap();

        assert_eq!(config.url, "https://wiki.example.com");
        assert_eq!(config.token, "pat");
        assert_eq!(config.token_source, SecretSource::EnvVar(TOKEN_ENV.to_string()));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_missing_url() {
        let err = ConnectionConfig::resolve(None, env(&[(TOKEN_ENV, "pat")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref env_var, .. } if env_var == URL_ENV));
    }

    #[test]
    fn test_missing_token() {
        let err = ConnectionConfig::resolve(None, env(&[(URL_ENV, "https://wiki")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref env_var, .. } if env_var == TOKEN_ENV));
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        let err = ConnectionConfig::resolve(None, env(&[(URL_ENV, "https://wiki"), (TOKEN_ENV, "")]))
            .unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile::from_toml(
            "[confluence]\nurl = \"https://file\"\ntoken = \"file-token\"\ntimeout_secs = 7\n",
        )
        .unwrap();

        let config =
            ConnectionConfig::resolve(Some(&file), env(&[(URL_ENV, "https://env")])).unwrap();
        assert_eq!(config.url, "https://env");
        assert_eq!(config.token, "file-token");
        assert_eq!(config.token_source, SecretSource::ConfigFile);
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_timeout_from_env() {
        let config = ConnectionConfig::resolve(
            None,
            env(&[(URL_ENV, "https://wiki"), (TOKEN_ENV, "pat"), (TIMEOUT_ENV, "90")]),
        )
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ConnectionConfig::resolve(
            None,
            env(&[(URL_ENV, "https://wiki"), (TOKEN_ENV, "pat"), (TIMEOUT_ENV, "soon")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ConnectionConfig::resolve(
            None,
            env(&[(URL_ENV, "https://wiki"), (TOKEN_ENV, "pat"), (TIMEOUT_ENV, "0")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ConnectionConfig::resolve(
            None,
            env(&[(URL_ENV, "https://wiki"), (TOKEN_ENV, "very-secret")]),
        )
        .unwrap();
        assert!(!format!("{:?}", config).contains("very-secret"));
    }
}
