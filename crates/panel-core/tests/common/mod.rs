// Shared helpers for panel-core integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use panel_api::{ApiClient, TransportConfig};
use panel_core::{CredentialStore, MemoryCredentialStore, User};
use url::Url;
use wiremock::MockServer;

pub fn client_for(base_url: &str, store: Arc<dyn CredentialStore>) -> ApiClient {
    let base_url = Url::parse(base_url).unwrap();
    ApiClient::new(base_url, store, &TransportConfig::default()).unwrap()
}

pub async fn server_and_client() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = client_for(&server.uri(), Arc::new(MemoryCredentialStore::new()));
    (server, client)
}

pub async fn signed_in(token: &str) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let store = MemoryCredentialStore::with_session(token, Some(user(1, "Ada")));
    let client = client_for(&server.uri(), Arc::new(store));
    (server, client)
}

pub fn user(id: u64, name: &str) -> User {
    User::new(id, name, format!("{}@example.com", name.to_lowercase()), "admin")
}

/// A base URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
