// ── Mutation controller ──
//
// Submits one change (create/update/delete) and reports its outcome.
// Not wired to any fetch controller: consumers inspect `success` and
// call `refetch()` themselves.

use std::sync::Arc;

use panel_api::{ApiClient, Error, Method, RequestExecutor};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::controller::{Admission, ControllerOptions, SettlementGuard};

/// Observable state of a mutation controller.
///
/// After settlement at most one of `success` / `error` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationState<T> {
    /// Payload returned by the last successful call.
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
}

impl<T> Default for MutationState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            success: false,
        }
    }
}

/// Generic "submit a change and report success/failure" controller.
pub struct MutationController<T = Value> {
    inner: Arc<MutationInner<T>>,
}

struct MutationInner<T> {
    executor: RequestExecutor,
    path: String,
    method: Method,
    options: ControllerOptions,
    state: watch::Sender<MutationState<T>>,
    guard: SettlementGuard,
}

impl<T> Clone for MutationController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> MutationController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create a controller bound to `path`. The method defaults to `POST`.
    pub fn new(client: ApiClient, path: impl Into<String>, options: ControllerOptions) -> Self {
        Self::with_method(client, path, Method::POST, options)
    }

    pub fn with_method(
        client: ApiClient,
        path: impl Into<String>,
        method: Method,
        options: ControllerOptions,
    ) -> Self {
        let (state, _) = watch::channel(MutationState::default());
        let guard = SettlementGuard::new(options.settlement);
        Self {
            inner: Arc::new(MutationInner {
                executor: RequestExecutor::new(client),
                path: path.into(),
                method,
                options,
                state,
                guard,
            }),
        }
    }

    /// Submit `payload` as the JSON body.
    ///
    /// Returns the decoded response on success. Failures are recorded in
    /// `error` and yield `None`.
    pub async fn mutate<B: Serialize + ?Sized>(&self, payload: &B) -> Option<T> {
        match serde_json::to_value(payload) {
            Ok(body) => self.submit(Some(body)).await,
            Err(e) => {
                let ticket = self.begin();
                self.settle(ticket, Err(Error::Serialization(e)))
            }
        }
    }

    /// Submit without a body (typically `DELETE`).
    pub async fn mutate_empty(&self) -> Option<T> {
        self.submit(None).await
    }

    fn begin(&self) -> u64 {
        let ticket = self.inner.guard.issue();
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
            state.success = false;
            state.data = None;
        });
        ticket
    }

    async fn submit(&self, body: Option<Value>) -> Option<T> {
        let ticket = self.begin();
        let result = self
            .inner
            .executor
            .execute::<T>(
                self.inner.method.clone(),
                &self.inner.path,
                body.as_ref(),
                Some(&self.inner.options.headers),
            )
            .await;
        self.settle(ticket, result)
    }

    fn settle(&self, ticket: u64, result: Result<T, Error>) -> Option<T> {
        let Admission::Apply { still_loading } = self.inner.guard.admit(ticket) else {
            debug!(path = %self.inner.path, ticket, "discarding stale mutation result");
            return result.ok();
        };

        let returned = result.as_ref().ok().cloned();
        self.inner.state.send_modify(|state| {
            state.loading = still_loading;
            match result {
                Ok(data) => {
                    state.data = Some(data);
                    state.success = true;
                    state.error = None;
                }
                Err(e) => {
                    debug!(method = %self.inner.method, path = %self.inner.path, error = %e, "mutation failed");
                    state.data = None;
                    state.success = false;
                    state.error = Some(e.to_string());
                }
            }
        });
        returned
    }

    // ── State observation ────────────────────────────────────────

    pub fn path(&self) -> &str {
        &self.inner.path
    }

    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    pub fn state(&self) -> MutationState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    pub fn success(&self) -> bool {
        self.inner.state.borrow().success
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationState<T>> {
        self.inner.state.subscribe()
    }
}
