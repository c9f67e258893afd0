//! The single domain error surfaced by the content facade.

use confluence_client::Error as ClientError;

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, ConfluenceError>;

/// Failure of a content operation.
///
/// The message names the operation and the offending identifier, followed
/// by the underlying cause.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ConfluenceError {
    message: String,
    #[source]
    source: Option<ClientError>,
}

impl ConfluenceError {
    /// Create an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a client error; the cause text is appended to `context`.
    pub fn with_source(context: impl AsRef<str>, source: ClientError) -> Self {
        Self {
            message: format!("{}: {}", context.as_ref(), source),
            source: Some(source),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The client error that caused this failure, if any.
    pub fn client_error(&self) -> Option<&ClientError> {
        self.source.as_ref()
    }

    /// Whether the remote service rejected a stale version.
    pub fn is_conflict(&self) -> bool {
        self.source.as_ref().is_some_and(ClientError::is_conflict)
    }
}
