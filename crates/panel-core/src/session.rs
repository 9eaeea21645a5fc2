// ── Session manager ──
//
// Owns the authentication state machine:
//
//   Unauthenticated ──start() w/ token──▶ Validating ──▶ Authenticated
//          ▲                                   │
//          └──────── invalid / logout() ◀──────┘
//
// Every transition writes the credential store first and flips the
// observable state second. Network failures are logged, never returned.

use std::sync::Arc;

use panel_api::{ApiClient, CredentialStore, Error, RequestExecutor, SessionValidation, User};
use secrecy::SecretString;
use strum::Display;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::OfflinePolicy;
use crate::error::CoreError;

/// Authentication state observable by consumers.
#[derive(Debug, Clone, PartialEq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AuthState {
    /// No session. Public/login surfaces only.
    Unauthenticated,
    /// A stored token is being checked with the backend.
    Validating,
    /// A user is signed in.
    Authenticated(User),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Session lifecycle manager.
///
/// Cheaply cloneable via `Arc<SessionInner>`.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Arc<dyn CredentialStore>,
    executor: RequestExecutor,
    offline_policy: OfflinePolicy,
    state: watch::Sender<AuthState>,
}

impl SessionManager {
    /// Create a manager in the `Unauthenticated` state. Does NOT touch the
    /// network -- call [`start()`](Self::start) to restore a stored session.
    pub fn new(client: ApiClient, offline_policy: OfflinePolicy) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            inner: Arc::new(SessionInner {
                store: Arc::clone(client.store()),
                executor: RequestExecutor::new(client),
                offline_policy,
                state,
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Restore the session from the credential store.
    ///
    /// Without a stored token this settles immediately on `Unauthenticated`.
    /// Otherwise the token is validated with the backend; see
    /// [`OfflinePolicy`] for what happens when the backend is unreachable.
    pub async fn start(&self) -> AuthState {
        let Some(token) = self.inner.store.token() else {
            debug!("no stored session token");
            return self.transition(AuthState::Unauthenticated);
        };

        self.transition(AuthState::Validating);

        let next = match self.inner.executor.validate_session(&token).await {
            Ok(SessionValidation {
                valid: true,
                user: Some(user),
            }) => {
                if let Err(e) = self.inner.store.set(&token, &user) {
                    warn!(error = %e, "could not refresh cached user (non-fatal)");
                }
                info!(user = %user.display_name(), "session restored");
                AuthState::Authenticated(user)
            }
            Ok(_) => {
                info!("stored session is no longer valid");
                self.inner.store.clear();
                AuthState::Unauthenticated
            }
            Err(e) if e.is_transport() => self.offline_fallback(&e),
            Err(e) => {
                warn!(error = %e, "session validation rejected");
                self.inner.store.clear();
                AuthState::Unauthenticated
            }
        };

        self.transition(next)
    }

    fn offline_fallback(&self, err: &Error) -> AuthState {
        if self.inner.offline_policy == OfflinePolicy::TrustCachedUser {
            if let Some(user) = self.inner.store.cached_user() {
                warn!(error = %err, user = %user.display_name(), "backend unreachable, trusting cached user");
                return AuthState::Authenticated(user);
            }
        }

        warn!(error = %err, policy = %self.inner.offline_policy, "backend unreachable, dropping stored session");
        self.inner.store.clear();
        AuthState::Unauthenticated
    }

    /// Record a session obtained through a separate sign-in flow.
    ///
    /// Fails only if the credential store cannot persist it; the state is
    /// left unchanged in that case.
    pub fn login(&self, token: SecretString, user: User) -> Result<(), CoreError> {
        self.inner.store.set(&token, &user)?;
        info!(user = %user.display_name(), "signed in");
        self.transition(AuthState::Authenticated(user));
        Ok(())
    }

    /// Validate a token issued elsewhere and, if the backend accepts it,
    /// sign in with the user it reports.
    pub async fn login_with_token(&self, token: SecretString) -> Result<User, CoreError> {
        let validation = self.inner.executor.validate_session(&token).await?;

        match validation {
            SessionValidation {
                valid: true,
                user: Some(user),
            } => {
                self.login(token, user.clone())?;
                Ok(user)
            }
            _ => Err(CoreError::InvalidSession),
        }
    }

    /// End the session.
    ///
    /// The backend logout call is best-effort; whatever happens there, the
    /// credential store is cleared and the state returns to `Unauthenticated`.
    pub async fn logout(&self) {
        if let Some(token) = self.inner.store.token() {
            if let Err(e) = self.inner.executor.end_session(&token).await {
                warn!(error = %e, "logout request failed (non-fatal)");
            }
        }

        self.inner.store.clear();
        self.transition(AuthState::Unauthenticated);
        info!("signed out");
    }

    fn transition(&self, next: AuthState) -> AuthState {
        debug!(state = %next, "session state");
        self.inner.state.send_replace(next.clone());
        next
    }

    // ── State observation ────────────────────────────────────────

    /// Current state snapshot.
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// The credential store backing this session.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &*self.inner.state.borrow())
            .field("offline_policy", &self.inner.offline_policy)
            .finish_non_exhaustive()
    }
}
