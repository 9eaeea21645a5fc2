// Session endpoints
//
// Token validation and server-side logout. Both send the token in the
// JSON body as `sessionToken` and as the bearer header, overriding
// whatever token the store currently holds.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::decode::null_as_default;
use crate::error::Error;
use crate::executor::RequestExecutor;
use crate::user::User;

/// Token validation endpoint.
pub const SESSION_PATH: &str = "/api/auth/session";

/// Server-side logout endpoint.
pub const LOGOUT_PATH: &str = "/api/auth/logout";

/// Response of `POST /api/auth/session`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionValidation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid: bool,
    #[serde(default)]
    pub user: Option<User>,
}

fn token_body(token: &SecretString) -> Value {
    json!({ "sessionToken": token.expose_secret() })
}

/// Bearer header for the token under test, not the stored one.
fn token_bearer(token: &SecretString) -> HeaderMap {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
        Ok(mut value) => {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Err(_) => debug!("session token is not a valid header value; body only"),
    }
    headers
}

impl RequestExecutor {
    /// Ask the backend whether `token` still identifies a live session.
    pub async fn validate_session(&self, token: &SecretString) -> Result<SessionValidation, Error> {
        debug!("validating session token");
        let headers = token_bearer(token);
        self.execute(Method::POST, SESSION_PATH, Some(&token_body(token)), Some(&headers))
            .await
    }

    /// End the session on the backend. Any 2xx counts as success.
    pub async fn end_session(&self, token: &SecretString) -> Result<(), Error> {
        debug!("ending session");
        let headers = token_bearer(token);
        self.execute_ignoring_body(
            Method::POST,
            LOGOUT_PATH,
            Some(&token_body(token)),
            Some(&headers),
        )
        .await
    }
}
