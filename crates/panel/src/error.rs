//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use panel_config::ConfigError;
use panel_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(panel::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Override the URL with --api-url or PANEL_API_URL."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(panel::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Session ──────────────────────────────────────────────────────

    #[error("Not signed in (profile '{profile}')")]
    #[diagnostic(
        code(panel::not_signed_in),
        help("Sign in with: panel login --profile {profile}")
    )]
    NotSignedIn { profile: String },

    #[error("Session token was rejected")]
    #[diagnostic(
        code(panel::auth_failed),
        help("Copy a fresh session token from the console and run: panel login")
    )]
    AuthFailed,

    #[error("Could not store the session: {message}")]
    #[diagnostic(
        code(panel::credential_store),
        help("Try another backend with --credential-store file|keyring|memory.")
    )]
    CredentialStore { message: String },

    // ── Requests ─────────────────────────────────────────────────────

    #[error("{action} failed: {message}")]
    #[diagnostic(code(panel::request_failed))]
    RequestFailed { action: String, message: String },

    #[error("Unexpected response from backend: {message}")]
    #[diagnostic(code(panel::decode))]
    Decode { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(panel::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(panel::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: panel config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(panel::config),
        help("Inspect the resolved configuration with: panel config show")
    )]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(panel::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(panel::json), help("Check the JSON contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotSignedIn { .. } | Self::AuthFailed => exit_code::AUTH,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::NotAuthenticated => CliError::NotSignedIn {
                profile: "current".into(),
            },

            CoreError::InvalidSession
            | CoreError::Rejected {
                status: 401 | 403, ..
            } => CliError::AuthFailed,

            CoreError::CredentialStore { message } => CliError::CredentialStore { message },

            CoreError::Rejected { status, message } => CliError::RequestFailed {
                action: "Request".into(),
                message: format!("HTTP {status}: {message}"),
            },

            CoreError::Decode { message } => CliError::Decode { message },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            ConfigError::CredentialStore { message } => CliError::CredentialStore { message },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
