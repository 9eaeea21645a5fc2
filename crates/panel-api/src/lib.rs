// panel-api: Async Rust client for the admin console backend (session + REST resources)

pub mod client;
pub mod credentials;
pub mod decode;
pub mod error;
pub mod executor;
pub mod session;
pub mod transport;
pub mod user;

pub use client::ApiClient;
pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use error::Error;
pub use executor::{RequestExecutor, RequestStatus};
pub use session::{LOGOUT_PATH, SESSION_PATH, SessionValidation};
pub use transport::{TlsMode, TransportConfig};
pub use user::{User, UserId};

// Re-exported so consumers can name methods and headers without a direct reqwest dependency.
pub use reqwest::Method;
pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
