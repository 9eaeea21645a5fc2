// ── Runtime console configuration ──
//
// These types describe *how* to reach the backend and how the session
// and controllers behave. They never touch disk: the CLI (or any other
// host) builds a `ConsoleConfig` and hands it in.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// What the session manager does when validation cannot reach the backend.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OfflinePolicy {
    /// Fall back to the cached user and stay signed in. A revoked session
    /// whose validation response is lost is indistinguishable from an
    /// offline legitimate user under this policy.
    #[default]
    TrustCachedUser,
    /// Treat an unreachable validation endpoint like a rejection.
    Reject,
}

/// Which result wins when calls on one controller overlap.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SettlementOrder {
    /// The most recently settled call wins, even if it was issued first.
    #[default]
    LastSettled,
    /// Results older than the newest already-applied call are discarded.
    LatestIssued,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for one console instance.
///
/// Built by the CLI, passed to `Console` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend base URL (e.g., `https://admin.example.com`).
    pub base_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout. `None` means calls wait on the transport indefinitely.
    pub timeout: Option<Duration>,
    /// Behaviour when session validation hits a transport failure.
    pub offline_policy: OfflinePolicy,
    /// Ordering rule applied by fetch and mutation controllers.
    pub settlement: SettlementOrder,
}

impl ConsoleConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsVerification::default(),
            timeout: None,
            offline_policy: OfflinePolicy::default(),
            settlement: SettlementOrder::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn policies_parse_from_kebab_case() {
        assert_eq!(
            "trust-cached-user".parse::<OfflinePolicy>().unwrap(),
            OfflinePolicy::TrustCachedUser
        );
        assert_eq!(
            "latest-issued".parse::<SettlementOrder>().unwrap(),
            SettlementOrder::LatestIssued
        );
        assert_eq!(SettlementOrder::LastSettled.to_string(), "last-settled");
    }
}
