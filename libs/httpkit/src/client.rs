//! Outgoing HTTP client with a bounded per-request timeout.
//!
//! Every call to an upstream dependency goes through this wrapper so that a
//! hung dependency turns into a timeout error instead of a stuck request,
//! and so that each outgoing call gets its own tracing span.

use std::time::Duration;

use tracing::Level;

/// Default timeout applied to every outgoing request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// An HTTP client that bounds every request with a timeout and records an
/// `outgoing_http` span per call.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Build a client with the given per-request timeout.
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { inner })
    }

    /// Wrap an already-configured `reqwest::Client`.
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Execute a built request inside an `outgoing_http` span, recording the
    /// response status.
    pub async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let url = req.url().clone();
        let method = req.method().clone();

        let span = tracing::span!(
            Level::INFO, "outgoing_http",
            http.method = %method,
            http.url = %url,
            http.status_code = tracing::field::Empty,
            error = tracing::field::Empty,
        );
        let _g = span.enter();

        let response = self.inner.execute(req).await?;

        span.record("http.status_code", response.status().as_u16());
        if response.status().is_client_error() || response.status().is_server_error() {
            span.record("error", true);
        }

        Ok(response)
    }

    /// Start a request builder for an arbitrary method.
    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }

    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner.get(url)
    }

    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner.post(url)
    }

    pub fn delete(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner.delete(url)
    }

    /// Send a fully-built request builder through the traced execution path.
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> reqwest::Result<reqwest::Response> {
        let req = builder.build()?;
        self.execute(req).await
    }

    /// Access the underlying `reqwest::Client`.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

impl From<reqwest::Client> for HttpClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT).unwrap_or_else(|_| Self::new(reqwest::Client::new()))
    }
}
