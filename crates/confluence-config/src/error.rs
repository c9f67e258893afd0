//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to load a `.env` file.
    #[error("failed to load env file '{path}': {message}")]
    EnvFile { path: String, message: String },

    /// A required setting is missing or empty.
    #[error("{env_var} environment variable not set")]
    Missing { field: String, env_var: String },

    /// A setting has a value that cannot be used.
    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },
}

impl ConfigError {
    /// Create a missing-setting error.
    pub fn missing(field: impl Into<String>, env_var: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
            env_var: env_var.into(),
        }
    }

    /// Check if this error is a missing required setting.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}
