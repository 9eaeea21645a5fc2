// Credential storage
//
// The store is a dumb key-value surface: a session token and the last
// known user snapshot. The request layer reads the token on every call;
// only the session manager writes it.

use std::sync::{PoisonError, RwLock};

use secrecy::SecretString;

use crate::error::Error;
use crate::user::User;

/// Durable storage for the session token and cached user.
///
/// Implementations perform no validation of the token. `clear` is
/// idempotent and never fails; backends log what they cannot remove.
pub trait CredentialStore: Send + Sync {
    /// The stored session token, if any.
    fn token(&self) -> Option<SecretString>;

    /// The last cached user snapshot, if any.
    fn cached_user(&self) -> Option<User>;

    /// Overwrite both the token and the user snapshot.
    fn set(&self, token: &SecretString, user: &User) -> Result<(), Error>;

    /// Remove both entries.
    fn clear(&self);
}

#[derive(Default)]
struct Entries {
    token: Option<SecretString>,
    user: Option<User>,
}

/// In-process credential store. Lives as long as the process.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<Entries>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing session.
    pub fn with_session(token: impl Into<String>, user: Option<User>) -> Self {
        Self {
            entries: RwLock::new(Entries {
                token: Some(SecretString::from(token.into())),
                user,
            }),
        }
    }
}

impl std::fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("MemoryCredentialStore")
            .field("has_token", &entries.token.is_some())
            .field("user", &entries.user)
            .finish()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<SecretString> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    fn cached_user(&self) -> Option<User> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }

    fn set(&self, token: &SecretString, user: &User) -> Result<(), Error> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.token = Some(token.clone());
        entries.user = Some(user.clone());
        Ok(())
    }

    fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.token = None;
        entries.user = None;
    }
}
