//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use crate::api::{ContentApi, SearchApi, SpacesApi};
use crate::error::{Error, ErrorResponse, Result};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path segments of the REST API below the base URL.
const API_PREFIX: [&str; 2] = ["rest", "api"];

/// Confluence REST API client.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```no_run
/// use confluence_client::ConfluenceClient;
///
/// # async fn example() -> confluence_client::Result<()> {
/// let client = ConfluenceClient::builder()
///     .base_url("https://wiki.example.com")
///     .token("secret")
///     .build()?;
///
/// let space = client.spaces().get("DEV").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConfluenceClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL of the Confluence instance (always ends with `/`).
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
}

impl std::fmt::Debug for ConfluenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfluenceClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

impl ConfluenceClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the spaces API.
    pub fn spaces(&self) -> SpacesApi {
        SpacesApi::new(self.clone())
    }

    /// Access the content (pages, labels, attachments) API.
    pub fn content(&self) -> ContentApi {
        ContentApi::new(self.clone())
    }

    /// Access the CQL search API.
    pub fn search(&self) -> SearchApi {
        SearchApi::new(self.clone())
    }

    /// Confirm the service is reachable and the token is accepted.
    ///
    /// Requests a single space; any failure is reported as [`Error::Connection`].
    pub async fn check_connection(&self) -> Result<()> {
        match self.spaces().list(0, 1).await {
            Ok(_) => {
                tracing::info!("connection test successful");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "connection test failed");
                Err(Error::Connection(e.to_string()))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path given as segments.
    ///
    /// Each segment is percent-encoded on its own, so ids containing `/`,
    /// `?` or `#` cannot address a different endpoint.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::InvalidPathSegment((*segment).to_string()));
        }

        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::Config(format!(
                    "Base URL cannot carry a path: {}",
                    self.inner.base_url
                ))
            })?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &[&str], query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        let response = self
            .inner
            .http
            .get(url)
            .query(query)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        self.get_with_query(path, &[] as &[(&str, &str)]).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &[&str], body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(%url, "POST");
        let response = self
            .inner
            .http
            .post(url)
            .json(body)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a PUT request.
    pub(crate) async fn put<T, B>(&self, path: &[&str], body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(%url, "PUT");
        let response = self
            .inner
            .http
            .put(url)
            .json(body)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();

        let message = match response.json::<ErrorResponse>().await {
            Ok(ErrorResponse {
                message: Some(message),
                ..
            }) => message,
            Ok(ErrorResponse {
                reason: Some(reason),
                ..
            }) => reason,
            _ => format!("HTTP {}", status),
        };

        match status {
            404 => Error::NotFound(message),
            401 => Error::Auth(message),
            _ => Error::Api { status, message },
        }
    }
}

/// Builder for creating a ConfluenceClient.
pub struct ClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL of the Confluence instance.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the personal access token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Validate the settings and build the client without touching the network.
    pub fn build(self) -> Result<ConfluenceClient> {
        let base_url = match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => {
                tracing::error!("Confluence base URL not set");
                return Err(Error::Config("Confluence base URL not set".to_string()));
            }
        };

        let token = match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => {
                tracing::error!("Confluence access token not set");
                return Err(Error::Config("Confluence access token not set".to_string()));
            }
        };

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        // Build default headers
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Config("Invalid access token".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("confluence-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(ConfluenceClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
            }),
        })
    }

    /// Build the client and confirm it can reach Confluence.
    ///
    /// Configuration problems fail before any request is sent; a failed
    /// reachability check yields [`Error::Connection`].
    pub async fn connect(self) -> Result<ConfluenceClient> {
        let client = self.build()?;
        tracing::info!(url = %client.base_url(), "connecting to Confluence");
        client.check_connection().await?;
        tracing::info!(url = %client.base_url(), "successfully connected to Confluence");
        Ok(client)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().token("t").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_requires_token() {
        let result = ClientBuilder::new().base_url("https://wiki").build();
        assert!(matches!(result, Err(Error::Config(_))));

        let result = ClientBuilder::new()
            .base_url("https://wiki")
            .token("   ")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let result = ClientBuilder::new().base_url("not a url").token("t").build();
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("https://wiki.example.com/confluence")
            .token("t")
            .build()
            .unwrap();

        assert_eq!(
            client.base_url().as_str(),
            "https://wiki.example.com/confluence/"
        );
    }

    #[test]
    fn test_url_building() {
        let client = ClientBuilder::new()
            .base_url("https://wiki.example.com/confluence")
            .token("t")
            .build()
            .unwrap();

        let url = client.url(&["space"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://wiki.example.com/confluence/rest/api/space"
        );

        let url = client.url(&["content", "12", "child", "page"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://wiki.example.com/confluence/rest/api/content/12/child/page"
        );
    }

    #[test]
    fn test_url_encodes_each_segment() {
        let client = ClientBuilder::new()
            .base_url("https://wiki.example.com")
            .token("t")
            .build()
            .unwrap();

        let url = client.url(&["content", "../space?limit=1#x"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://wiki.example.com/rest/api/content/..%2Fspace%3Flimit=1%23x"
        );
    }

    #[test]
    fn test_url_rejects_dot_segments() {
        let client = ClientBuilder::new()
            .base_url("https://wiki.example.com")
            .token("t")
            .build()
            .unwrap();

        for segment in ["", ".", ".."] {
            let err = client.url(&["content", segment]).unwrap_err();
            assert!(matches!(err, Error::InvalidPathSegment(_)));
        }
    }

    #[test]
    fn test_debug_hides_token() {
        let builder = ClientBuilder::new().base_url("https://wiki").token("hunter2");
        assert!(!format!("{:?}", builder).contains("hunter2"));
    }

    #[test]
    fn test_custom_timeout() {
        let client = ClientBuilder::new()
            .base_url("https://wiki")
            .token("t")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }
}
