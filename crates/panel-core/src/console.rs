// ── Console ──
//
// The application context. Built once from a `ConsoleConfig` and a
// credential store, it owns the shared `ApiClient` and the session
// manager and hands out resource hooks. Passed around explicitly.

use std::sync::Arc;

use panel_api::{ApiClient, CredentialStore, TlsMode, TransportConfig};

use crate::config::{ConsoleConfig, TlsVerification};
use crate::controller::ControllerOptions;
use crate::error::CoreError;
use crate::resource::{
    Analytics, Campaigns, Contacts, Funnels, Orders, Products, Resource, ResourceHooks,
    Subscriptions, Workflows,
};
use crate::session::{AuthState, SessionManager};

/// Cheaply cloneable via `Arc<ConsoleInner>`.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    client: ApiClient,
    session: SessionManager,
}

impl Console {
    /// Build the HTTP client and session manager. Does NOT touch the
    /// network -- call [`start()`](Self::start) to restore a stored session.
    pub fn new(config: ConsoleConfig, store: Arc<dyn CredentialStore>) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = ApiClient::new(config.base_url.clone(), store, &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Wrap an already-built client. Transport settings in `config` are
    /// ignored; the client's own apply.
    pub fn with_client(config: ConsoleConfig, client: ApiClient) -> Self {
        let session = SessionManager::new(client.clone(), config.offline_policy);
        Self {
            inner: Arc::new(ConsoleInner {
                config,
                client,
                session,
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        self.inner.client.store()
    }

    /// Restore the stored session. Shorthand for `session().start()`.
    pub async fn start(&self) -> AuthState {
        self.inner.session.start().await
    }

    // ── Resource hooks ───────────────────────────────────────────

    /// Hooks for any resource type.
    pub fn resource<R: Resource>(&self) -> ResourceHooks<R> {
        ResourceHooks::new(self.inner.client.clone(), self.controller_options())
    }

    pub fn funnels(&self) -> ResourceHooks<Funnels> {
        self.resource()
    }

    pub fn products(&self) -> ResourceHooks<Products> {
        self.resource()
    }

    pub fn campaigns(&self) -> ResourceHooks<Campaigns> {
        self.resource()
    }

    pub fn contacts(&self) -> ResourceHooks<Contacts> {
        self.resource()
    }

    pub fn workflows(&self) -> ResourceHooks<Workflows> {
        self.resource()
    }

    pub fn analytics(&self) -> ResourceHooks<Analytics> {
        self.resource()
    }

    pub fn subscriptions(&self) -> ResourceHooks<Subscriptions> {
        self.resource()
    }

    pub fn orders(&self) -> ResourceHooks<Orders> {
        self.resource()
    }

    fn controller_options(&self) -> ControllerOptions {
        ControllerOptions::with_settlement(self.inner.config.settlement)
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &ConsoleConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        ..TransportConfig::default()
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
