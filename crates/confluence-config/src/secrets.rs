//! Token resolution with provenance.
//!
//! Resolution order:
//! 1. Environment variable (`.env` values are already merged into the environment)
//! 2. Config file (with warning)

/// Result of secret resolution with provenance.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value.
    pub value: String,
    /// Where the secret was found.
    pub source: SecretSource,
}

impl std::fmt::Debug for ResolvedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecret")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Where a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Config file (plaintext — not recommended).
    ConfigFile,
}

impl SecretSource {
    /// Whether the secret was read from a plaintext file.
    pub fn is_plaintext(&self) -> bool {
        matches!(self, SecretSource::ConfigFile)
    }
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {}", var),
            SecretSource::ConfigFile => write!(f, "config file (plaintext)"),
        }
    }
}

/// Resolve a secret from an environment lookup, falling back to a config value.
///
/// Empty values are treated as absent at every step.
pub fn resolve_secret<F>(env_var: &str, lookup: F, config_value: Option<&str>) -> Option<ResolvedSecret>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(env_var).filter(|v| !v.trim().is_empty()) {
        return Some(ResolvedSecret {
            value,
            source: SecretSource::EnvVar(env_var.to_string()),
        });
    }

    config_value
        .filter(|v| !v.trim().is_empty())
        .map(|v| ResolvedSecret {
            value: v.to_string(),
            source: SecretSource::ConfigFile,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_env_var_wins_over_config() {
        let resolved = resolve_secret(
            "TOKEN",
            |k| (k == "TOKEN").then(|| "from-env".to_string()),
            Some("from-file"),
        )
        .unwrap();
        assert_eq!(resolved.value, "from-env");
        assert_eq!(resolved.source, SecretSource::EnvVar("TOKEN".to_string()));
    }

    #[test]
    fn test_resolve_from_config_value() {
        let resolved = resolve_secret("TOKEN", no_env, Some("my-key")).unwrap();
        assert_eq!(resolved.value, "my-key");
        assert_eq!(resolved.source, SecretSource::ConfigFile);
        assert!(resolved.source.is_plaintext());
    }

    #[test]
    fn test_empty_values_are_absent() {
        let resolved = resolve_secret("TOKEN", |_| Some("  ".to_string()), Some(""));
        assert!(resolved.is_none());
    }

    #[test]
    fn test_secret_source_display() {
        assert_eq!(
            SecretSource::EnvVar("CONFLUENCE_PERSONAL_ACCESS_TOKEN".to_string()).to_string(),
            "env var CONFLUENCE_PERSONAL_ACCESS_TOKEN"
        );
        assert_eq!(
            SecretSource::ConfigFile.to_string(),
            "config file (plaintext)"
        );
    }

    #[test]
    fn test_debug_redacts_value() {
        let resolved = resolve_secret("TOKEN", no_env, Some("super-secret")).unwrap();
        let debug = format!("{:?}", resolved);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }
}
