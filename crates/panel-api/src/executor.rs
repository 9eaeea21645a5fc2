// Request executor
//
// One executor per controller instance. Each call brackets its lifetime
// with `loading` and records the most recent failure message. Calls are
// independent: no dedup, no retry, no cancellation. When calls overlap,
// whichever settles last decides the visible status.

use std::future::Future;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

/// Observable status of an executor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    /// True only while a call is in flight.
    pub loading: bool,
    /// Message of the most recent failure; cleared when a new call starts.
    pub error: Option<String>,
}

/// Issues authenticated calls and tracks their loading/error status.
pub struct RequestExecutor {
    client: ApiClient,
    status: watch::Sender<RequestStatus>,
}

impl RequestExecutor {
    pub fn new(client: ApiClient) -> Self {
        let (status, _) = watch::channel(RequestStatus::default());
        Self { client, status }
    }

    /// The client this executor sends through.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Current status snapshot.
    pub fn status(&self) -> RequestStatus {
        self.status.borrow().clone()
    }

    pub fn loading(&self) -> bool {
        self.status.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.status.borrow().error.clone()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<RequestStatus> {
        self.status.subscribe()
    }

    /// Perform one call and decode its JSON payload.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: Option<&HeaderMap>,
    ) -> Result<T, Error> {
        self.track(self.client.request(method, path, body, headers))
            .await
    }

    /// Perform one call whose response body is irrelevant.
    pub async fn execute_ignoring_body(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: Option<&HeaderMap>,
    ) -> Result<(), Error> {
        self.track(self.client.request_ignoring_body(method, path, body, headers))
            .await
    }

    /// `GET` shorthand.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.execute(Method::GET, path, None, None).await
    }

    async fn track<T>(&self, call: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        self.status.send_replace(RequestStatus {
            loading: true,
            error: None,
        });

        let result = call.await;

        self.status.send_modify(|status| {
            status.loading = false;
            if let Err(e) = &result {
                debug!(error = %e, "request failed");
                status.error = Some(e.to_string());
            }
        });

        result
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("client", &self.client)
            .field("status", &*self.status.borrow())
            .finish()
    }
}
