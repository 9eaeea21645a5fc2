// ── Fetch controller ──
//
// Loads one resource path and keeps the result around for re-fetch.
// A load is issued whenever the target path changes (including the
// first mount) and whenever `refetch()` is called. Nothing is cached
// across paths or across controller instances.

use std::sync::{Arc, Mutex, PoisonError};

use panel_api::{ApiClient, Method, RequestExecutor};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::debug;

use crate::controller::{Admission, ControllerOptions, SettlementGuard};

/// Observable state of a fetch controller.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    /// Parsed payload of the last successful load; `None` after a failure.
    pub data: Option<T>,
    pub loading: bool,
    /// Message of the last failed load; `None` after a success.
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Generic "load a resource and keep it available for re-fetch" controller.
///
/// Cheaply cloneable; clones drive the same instance.
pub struct FetchController<T> {
    inner: Arc<FetchInner<T>>,
}

struct FetchInner<T> {
    executor: RequestExecutor,
    options: ControllerOptions,
    path: Mutex<Option<String>>,
    state: watch::Sender<FetchState<T>>,
    guard: SettlementGuard,
}

impl<T> Clone for FetchController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> FetchController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create an idle controller with no target path.
    pub fn new(client: ApiClient, options: ControllerOptions) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        let guard = SettlementGuard::new(options.settlement);
        Self {
            inner: Arc::new(FetchInner {
                executor: RequestExecutor::new(client),
                options,
                path: Mutex::new(None),
                state,
                guard,
            }),
        }
    }

    /// Create a controller and perform its first load.
    pub async fn mount(client: ApiClient, path: impl Into<String>, options: ControllerOptions) -> Self {
        let controller = Self::new(client, options);
        controller.set_path(path).await;
        controller
    }

    /// Point the controller at `path`.
    ///
    /// Loads only when the path differs from the current one; returns
    /// whether a load was issued. The previous result is discarded first.
    pub async fn set_path(&self, path: impl Into<String>) -> bool {
        let path = path.into();
        {
            let mut current = self.inner.path.lock().unwrap_or_else(PoisonError::into_inner);
            if current.as_deref() == Some(path.as_str()) {
                return false;
            }
            *current = Some(path.clone());
        }

        self.load(&path, true).await;
        true
    }

    /// Re-issue the load for the current path. No-op before a path is set.
    pub async fn refetch(&self) {
        let path = self
            .inner
            .path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match path {
            Some(path) => self.load(&path, false).await,
            None => debug!("refetch requested before a path was set"),
        }
    }

    async fn load(&self, path: &str, discard_data: bool) {
        let ticket = self.inner.guard.issue();
        self.inner.state.send_modify(|state| {
            if discard_data {
                state.data = None;
            }
            state.loading = true;
            state.error = None;
        });

        let headers = &self.inner.options.headers;
        let result = self
            .inner
            .executor
            .execute::<T>(Method::GET, path, None, Some(headers))
            .await;

        match self.inner.guard.admit(ticket) {
            Admission::Discard => {
                debug!(path, ticket, "discarding stale fetch result");
            }
            Admission::Apply { still_loading } => {
                self.inner.state.send_modify(|state| {
                    state.loading = still_loading;
                    match result {
                        Ok(data) => {
                            state.data = Some(data);
                            state.error = None;
                        }
                        Err(e) => {
                            debug!(path, error = %e, "fetch failed");
                            state.data = None;
                            state.error = Some(e.to_string());
                        }
                    }
                });
            }
        }
    }

    // ── State observation ────────────────────────────────────────

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.inner.state.borrow().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    /// The path currently targeted, if any.
    pub fn path(&self) -> Option<String> {
        self.inner
            .path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.inner.state.subscribe()
    }
}
