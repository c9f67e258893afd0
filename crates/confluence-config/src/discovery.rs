//! Config file discovery, layered merging and `.env` loading.
//!
//! Resolution order (later overrides earlier):
//! 1. `~/.config/confluence-mcp/config.toml` (XDG user config)
//! 2. `./confluence-mcp.toml` (project-local)
//!
//! An explicit `--config` path replaces discovery entirely.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{ConfigError, Result};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "confluence-mcp.toml";

/// Default config filename within XDG config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for XDG directory resolution.
const APP_NAME: &str = "confluence-mcp";

/// Environment variable to override the config directory.
const CONFIG_DIR_ENV: &str = "CONFLUENCE_MCP_CONFIG_DIR";

/// Root of the TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Connection settings.
    #[serde(default)]
    pub confluence: ConfluenceSection,
}

/// The `[confluence]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfluenceSection {
    /// Base URL of the Confluence instance.
    #[serde(default)]
    pub url: Option<String>,
    /// Personal access token (prefer the environment variable).
    #[serde(default)]
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Parse a config file from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Merge another layer on top of this one. Values set in `other` win.
    pub fn merge(&mut self, other: ConfigFile) {
        let section = &mut self.confluence;
        let upper = other.confluence;
        if upper.url.is_some() {
            section.url = upper.url;
        }
        if upper.token.is_some() {
            section.token = upper.token;
        }
        if upper.timeout_secs.is_some() {
            section.timeout_secs = upper.timeout_secs;
        }
    }
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    ConfigFile::from_toml(&contents)
}

/// Discover and merge config files.
///
/// With `explicit`, only that file is read and it must exist. Otherwise the
/// user and project-local layers are merged; missing layers are skipped.
/// Returns the merged config and the paths that were actually loaded.
pub fn discover_config_file(
    explicit: Option<&Path>,
    project_dir: Option<&Path>,
) -> Result<(ConfigFile, Vec<PathBuf>)> {
    if let Some(path) = explicit {
        let config = load_config_file(path)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        return Ok((config, vec![path.to_path_buf()]));
    }

    let mut config = ConfigFile::default();
    let mut loaded = Vec::new();

    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));

    for path in xdg_config_path().into_iter().chain([project_path]) {
        if !path.is_file() {
            continue;
        }
        config.merge(load_config_file(&path)?);
        tracing::debug!(path = %path.display(), "loaded config layer");
        loaded.push(path);
    }

    Ok((config, loaded))
}

/// Get the XDG config file path for confluence-mcp.
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// Get the XDG config directory for confluence-mcp.
///
/// Checks `CONFLUENCE_MCP_CONFIG_DIR` first, then falls back to the platform default.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Load a `.env` file into the process environment.
///
/// Variables already present in the environment are not overridden. With no
/// explicit path, `.env` is searched from the current directory upwards and a
/// missing file is not an error; an explicit path must exist.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            tracing::debug!(path = %path.display(), "loaded env file");
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => {
                tracing::debug!(path = %found.display(), "loaded env file");
                Ok(Some(found))
            }
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(ConfigError::EnvFile {
                path: ".env".to_string(),
                message: e.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_xdg_config_path_suffix() {
        if let Some(p) = xdg_config_path() {
            assert!(p.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[confluence]
url = "https://wiki.example.com"
timeout_secs = 12
"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(
            config.confluence.url.as_deref(),
            Some("https://wiki.example.com")
        );
        assert_eq!(config.confluence.timeout_secs, Some(12));
        assert!(config.confluence.token.is_none());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is not valid toml {{{{").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = ConfigFile::from_toml("[confluence]\nurll = \"typo\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_merge_prefers_upper_layer() {
        let mut base = ConfigFile::from_toml(
            "[confluence]\nurl = \"https://base\"\ntimeout_secs = 5\n",
        )
        .unwrap();
        let upper = ConfigFile::from_toml("[confluence]\nurl = \"https://upper\"\n").unwrap();
        base.merge(upper);

        assert_eq!(base.confluence.url.as_deref(), Some("https://upper"));
        assert_eq!(base.confluence.timeout_secs, Some(5));
    }

    #[test]
    fn test_discover_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[confluence]\nurl = \"https://explicit\"\n").unwrap();

        let (config, loaded) = discover_config_file(Some(&path), None).unwrap();
        assert_eq!(config.confluence.url.as_deref(), Some("https://explicit"));
        assert_eq!(loaded, vec![path]);
    }

    #[test]
    fn test_discover_explicit_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(discover_config_file(Some(&path), None).is_err());
    }

    #[test]
    fn test_discover_project_layer() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[confluence]\nurl = \"https://project\"\n",
        )
        .unwrap();

        let (config, loaded) = discover_config_file(None, Some(dir.path())).unwrap();
        assert_eq!(config.confluence.url.as_deref(), Some("https://project"));
        assert!(loaded.iter().any(|p| p.ends_with(PROJECT_CONFIG_FILE)));
    }

    #[test]
    fn test_load_dotenv_explicit_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load_dotenv(Some(&dir.path().join("nope.env"))).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }
}
