//! CLI configuration resolution.
//!
//! Loads the shared TOML config, selects a profile, and layers the
//! global flags on top before handing a `ConsoleConfig` to the core.

use panel_config::{Config, ConfigError, CredentialBackend, Profile};
use panel_core::ConsoleConfig;

use crate::cli::{GlobalOpts, StoreBackend};
use crate::error::CliError;

/// Everything needed to build a `Console` for one invocation.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub console: ConsoleConfig,
    pub backend: CredentialBackend,
}

/// Profile name selected by `--profile`, else the configured default.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Resolve the profile plus CLI overrides into a console configuration.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = panel_config::load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = cfg.profile(&profile_name).map_err(|e| match e {
        ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
            name: profile,
            available: available_profiles(&cfg),
        },
        other => other.into(),
    })?;
    apply_overrides(&mut profile, global);

    let console = panel_config::profile_to_console_config(&profile, &cfg.defaults)?;
    let backend = profile
        .credential_store
        .unwrap_or(cfg.defaults.credential_store);

    Ok(Resolved {
        profile_name,
        console,
        backend,
    })
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if let Some(backend) = global.credential_store {
        profile.credential_store = Some(match backend {
            StoreBackend::File => CredentialBackend::File,
            StoreBackend::Keyring => CredentialBackend::Keyring,
            StoreBackend::Memory => CredentialBackend::Memory,
        });
    }
}

/// Comma-separated profile names, sorted, for help text.
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}
