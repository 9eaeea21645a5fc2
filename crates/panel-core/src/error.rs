// ── Core error types ──
//
// User-facing errors from panel-core. Controllers never return these:
// their failures land in `error` strings. Only operations with a caller
// that must react (console construction, login) surface a `CoreError`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Session errors ───────────────────────────────────────────────
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Session token was not accepted by the backend")]
    InvalidSession,

    #[error("Credential store error: {message}")]
    CredentialStore { message: String },

    // ── API errors ───────────────────────────────────────────────────
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response from backend: {message}")]
    Decode { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<panel_api::Error> for CoreError {
    fn from(err: panel_api::Error) -> Self {
        match err {
            panel_api::Error::Rejected {
                status,
                status_text,
            } => CoreError::Rejected {
                status,
                message: status_text,
            },
            panel_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            panel_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            panel_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            panel_api::Error::Serialization(e) => CoreError::Decode {
                message: format!("could not encode request body: {e}"),
            },
            panel_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
            panel_api::Error::Store(message) => CoreError::CredentialStore { message },
        }
    }
}
