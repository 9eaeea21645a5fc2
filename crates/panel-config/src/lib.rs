//! Shared configuration for the admin console tools.
//!
//! TOML profiles, platform paths, durable credential stores, and
//! translation to `panel_core::ConsoleConfig`. The CLI layers its
//! flag overrides on top of what this crate resolves.

pub mod store;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use panel_core::{
    ConsoleConfig, CredentialStore, MemoryCredentialStore, OfflinePolicy, SettlementOrder,
    TlsVerification,
};

pub use store::{FileCredentialStore, KeyringCredentialStore};

/// Backend URL used when neither a profile nor an override names one.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' is not defined")]
    UnknownProfile { profile: String },

    #[error("credential store unavailable: {message}")]
    CredentialStore { message: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the requested one, else the configured
    /// default, else `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile. An undefined `"default"` profile resolves to
    /// built-in settings so the tools work without a config file; any
    /// other undefined name is an error.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile {
                profile: name.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout: Option<u64>,

    #[serde(default)]
    pub credential_store: CredentialBackend,

    #[serde(default)]
    pub offline_policy: OfflinePolicy,

    #[serde(default)]
    pub settlement: SettlementOrder,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: None,
            credential_store: CredentialBackend::default(),
            offline_policy: OfflinePolicy::default(),
            settlement: SettlementOrder::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named backend profile. Unset fields fall back to [`Defaults`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://admin.example.com").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Where the session token is kept.
    pub credential_store: Option<CredentialBackend>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    pub offline_policy: Option<OfflinePolicy>,

    pub settlement: Option<SettlementOrder>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            credential_store: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            offline_policy: None,
            settlement: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

/// Credential store backend.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CredentialBackend {
    /// JSON file under the platform data directory.
    #[default]
    File,
    /// OS keyring for the token, sidecar file for the cached user.
    Keyring,
    /// Process memory only; nothing survives exit.
    Memory,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "panel", "panel")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("panel");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding persisted sessions, one file per profile.
pub fn sessions_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join("sessions"),
        |dirs| dirs.data_dir().join("sessions"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file path + environment.
///
/// Environment keys use the `PANEL_` prefix with `__` between nesting
/// levels, e.g. `PANEL_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PANEL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ConsoleConfig` from a profile, falling back to `defaults`.
pub fn profile_to_console_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let base_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = profile.timeout.or(defaults.timeout).map(Duration::from_secs);

    Ok(ConsoleConfig {
        base_url,
        tls,
        timeout,
        offline_policy: profile.offline_policy.unwrap_or(defaults.offline_policy),
        settlement: profile.settlement.unwrap_or(defaults.settlement),
    })
}

/// Open the credential store configured for a profile.
pub fn open_credential_store(
    backend: CredentialBackend,
    profile_name: &str,
) -> Result<Arc<dyn CredentialStore>, ConfigError> {
    let dir = sessions_dir();
    let store: Arc<dyn CredentialStore> = match backend {
        CredentialBackend::File => {
            Arc::new(FileCredentialStore::open(dir.join(format!("{profile_name}.json"))))
        }
        CredentialBackend::Keyring => Arc::new(KeyringCredentialStore::open(
            profile_name,
            dir.join(format!("{profile_name}.user.json")),
        )?),
        CredentialBackend::Memory => Arc::new(MemoryCredentialStore::new()),
    };
    Ok(store)
}
