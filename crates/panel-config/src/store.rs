// ── Durable credential stores ──
//
// Two backends for `CredentialStore` that survive process exit:
//
//   FileCredentialStore     one JSON document per profile holding exactly
//                           `sessionToken` and `user` (the user serialized
//                           into a string)
//   KeyringCredentialStore  token in the OS keyring, cached user in a
//                           sidecar JSON file
//
// Both keep an in-memory mirror and write through on `set`/`clear`.
// Unreadable or corrupt persisted state reads as empty.

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use panel_api::{CredentialStore, Error, User};

use crate::ConfigError;

const KEYRING_SERVICE: &str = "panel";

#[derive(Default)]
struct Entries {
    token: Option<SecretString>,
    user: Option<User>,
}

// ── File store ──────────────────────────────────────────────────────

/// On-disk shape: two string keys, nothing else.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Persisted {
    session_token: Option<String>,
    user: Option<String>,
}

/// Session persisted as a JSON file.
pub struct FileCredentialStore {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl FileCredentialStore {
    /// Open the store at `path`, loading whatever session it holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_persisted(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_persisted(path: &Path) -> Entries {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Entries::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read stored session");
            return Entries::default();
        }
    };

    let persisted: Persisted = match serde_json::from_str(&raw) {
        Ok(p) => p,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "stored session is corrupt, ignoring");
            return Entries::default();
        }
    };

    let user = persisted.user.as_deref().and_then(|raw| {
        serde_json::from_str::<User>(raw)
            .inspect_err(|e| warn!(error = %e, "cached user is corrupt, ignoring"))
            .ok()
    });

    Entries {
        token: persisted.session_token.map(SecretString::from),
        user,
    }
}

impl CredentialStore for FileCredentialStore {
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
        let persisted = Persisted {
            session_token: Some(token.expose_secret().to_owned()),
            user: Some(serde_json::to_string(user).map_err(Error::Serialization)?),
        };
        let body = serde_json::to_vec_pretty(&persisted).map_err(Error::Serialization)?;
        write_private(&self.path, &body)
            .map_err(|e| Error::Store(format!("{}: {e}", self.path.display())))?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.token = Some(token.clone());
        entries.user = Some(user.clone());
        debug!(path = %self.path.display(), "session persisted");
        Ok(())
    }

    fn clear(&self) {
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = Entries::default();
        remove_if_present(&self.path);
    }
}

impl std::fmt::Debug for FileCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("FileCredentialStore")
            .field("path", &self.path)
            .field("has_token", &entries.token.is_some())
            .field("user", &entries.user.as_ref().map(User::display_name))
            .finish()
    }
}

// ── Keyring store ───────────────────────────────────────────────────

/// Session token in the OS keyring; cached user in a sidecar file.
pub struct KeyringCredentialStore {
    entry: keyring::Entry,
    user_path: PathBuf,
    entries: RwLock<Entries>,
}

impl KeyringCredentialStore {
    /// Open the keyring entry `"{profile}/session-token"` and the sidecar
    /// user file, loading whatever session they hold.
    pub fn open(profile: &str, user_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile}/session-token"))
            .map_err(|e| ConfigError::CredentialStore {
                message: e.to_string(),
            })?;
        let user_path = user_path.into();

        let token = match entry.get_password() {
            Ok(secret) => Some(SecretString::from(secret)),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, "cannot read session token from keyring");
                None
            }
        };
        let user = token.as_ref().and_then(|_| read_user(&user_path));

        Ok(Self {
            entry,
            user_path,
            entries: RwLock::new(Entries { token, user }),
        })
    }
}

fn read_user(path: &Path) -> Option<User> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw)
        .inspect_err(|e| warn!(path = %path.display(), error = %e, "cached user is corrupt, ignoring"))
        .ok()
}

impl CredentialStore for KeyringCredentialStore {
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
        let previous = self.cached_user();
        write_user_then_token(&self.user_path, user, previous.as_ref(), || {
            self.entry
                .set_password(token.expose_secret())
                .map_err(|e| Error::Store(format!("keyring: {e}")))
        })?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.token = Some(token.clone());
        entries.user = Some(user.clone());
        Ok(())
    }

    fn clear(&self) {
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = Entries::default();
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(e) => warn!(error = %e, "cannot remove session token from keyring"),
        }
        remove_if_present(&self.user_path);
    }
}

/// Write the sidecar user, then the token. If the token write fails the
/// sidecar is put back to `previous`, so a failed `set` changes nothing.
fn write_user_then_token(
    user_path: &Path,
    user: &User,
    previous: Option<&User>,
    write_token: impl FnOnce() -> Result<(), Error>,
) -> Result<(), Error> {
    let body = serde_json::to_vec_pretty(user).map_err(Error::Serialization)?;
    write_private(user_path, &body)
        .map_err(|e| Error::Store(format!("{}: {e}", user_path.display())))?;

    write_token().inspect_err(|_| match previous {
        Some(old) => {
            let restored = serde_json::to_vec_pretty(old)
                .map_err(io::Error::other)
                .and_then(|body| write_private(user_path, &body));
            if let Err(e) = restored {
                warn!(path = %user_path.display(), error = %e, "cannot restore cached user");
            }
        }
        None => remove_if_present(user_path),
    })
}

impl std::fmt::Debug for KeyringCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringCredentialStore")
            .field("user_path", &self.user_path)
            .finish_non_exhaustive()
    }
}

// ── File helpers ────────────────────────────────────────────────────

/// Write `body` to `path` via a sibling temp file and rename, readable
/// by the owner only on Unix.
fn write_private(path: &Path, body: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp)?;
    file.write_all(body)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp, path)
}

fn remove_if_present(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "stored session removed"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "cannot remove stored session"),
    }
}
