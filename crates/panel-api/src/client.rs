// Backend HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer credential
// injection from the credential store, and status/JSON normalization.
// Loading/error bookkeeping lives one layer up in `RequestExecutor`.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::credentials::CredentialStore;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Cheaply cloneable handle to the backend.
///
/// All clones share one connection pool and one credential store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `https://admin.example.com`);
    /// request paths such as `/api/funnels` are appended to it verbatim.
    pub fn new(
        base_url: Url,
        store: Arc<dyn CredentialStore>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, store))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                store,
            }),
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The credential store consulted on every request.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL: `{base}{path}`. The path may carry a query string.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Default headers for every call: JSON content type plus bearer
    /// credentials when a token is stored. `extra` overrides same-named entries.
    fn headers(&self, extra: Option<&HeaderMap>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.inner.store.token() {
            match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => debug!("stored token is not a valid header value; sending unauthenticated"),
            }
        }

        if let Some(extra) = extra {
            for (name, value) in extra {
                headers.insert(name.clone(), value.clone());
            }
        }

        headers
    }

    /// Send a request and return the response if its status is a success.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        extra_headers: Option<&HeaderMap>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);

        let mut builder = self
            .inner
            .http
            .request(method, url)
            .headers(self.headers(extra_headers));

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            debug!(%status, "request rejected");
            return Err(Error::rejected(status));
        }

        Ok(resp)
    }

    /// Send a request and parse the JSON response body.
    ///
    /// An empty success body is treated as JSON `null`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        extra_headers: Option<&HeaderMap>,
    ) -> Result<T, Error> {
        let resp = self.dispatch(method, path, body, extra_headers).await?;
        let text = resp.text().await.map_err(Error::Transport)?;
        trace!(bytes = text.len(), "response body received");

        let parsed = if text.trim().is_empty() {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_str(&text)
        };

        parsed.map_err(|e| {
            let preview: String = text.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: text,
            }
        })
    }

    /// Send a request, checking only the status. The body is discarded.
    pub async fn request_ignoring_body(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        extra_headers: Option<&HeaderMap>,
    ) -> Result<(), Error> {
        self.dispatch(method, path, body, extra_headers).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}
