// ── Authenticated principal ──
//
// The user snapshot returned by the session endpoint and cached next to
// the token. Only `id` is required; everything else defaults so older
// and newer backends both decode.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decode::null_as_default;

/// Identifier of a user.
///
/// Backends hand out either numeric or string ids; consumers never care which.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for UserId {
    fn from(n: u64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Snapshot of the authenticated principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    /// Any additional fields the backend sends (avatar, plan, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: role.into(),
            extra: Map::new(),
        }
    }

    /// Best human-readable label: name, then email, then id.
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            self.name.clone()
        } else if !self.email.is_empty() {
            self.email.clone()
        } else {
            self.id.to_string()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_numeric_and_text_ids() {
        let a: User = serde_json::from_value(json!({ "id": 7, "name": "Ada" })).unwrap();
        let b: User = serde_json::from_value(json!({ "id": "u_7", "email": "b@x.io" })).unwrap();

        assert_eq!(a.id, UserId::Numeric(7));
        assert_eq!(b.id, UserId::Text("u_7".into()));
        assert_eq!(b.role, "");
    }

    #[test]
    fn null_fields_decode_as_empty() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "name": "Ada",
            "email": null,
            "role": null
        }))
        .unwrap();

        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "");
        assert_eq!(user.role, "");
    }

    #[test]
    fn keeps_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "name": "Ada",
            "email": "ada@example.com",
            "role": "admin",
            "plan": "pro"
        }))
        .unwrap();

        assert_eq!(user.extra.get("plan"), Some(&json!("pro")));
        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["plan"], "pro");
        assert_eq!(back["role"], "admin");
    }

    #[test]
    fn display_name_falls_back() {
        assert_eq!(User::new(3_u64, "", "e@x.io", "").display_name(), "e@x.io");
        assert_eq!(User::new(3_u64, "", "", "").display_name(), "3");
    }
}
