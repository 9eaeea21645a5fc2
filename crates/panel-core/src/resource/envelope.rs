// ── Collection envelope ──
//
// Collection responses arrive as `{ "data": [...] }`. A missing or null
// `data`, or a payload that is not an object at all, decodes as an empty
// collection so consumers never have to special-case "nothing there".
// Records that are present but malformed are still an error.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded `{ data: [...] }` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionEnvelope<T> {
    pub data: Vec<T>,
}

impl<T> Default for CollectionEnvelope<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T: DeserializeOwned> TryFrom<Value> for CollectionEnvelope<T> {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut map) = value else {
            return Ok(Self::default());
        };

        match map.remove("data") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(data) => Ok(Self {
                data: serde_json::from_value(data)?,
            }),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for CollectionEnvelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(value: Value) -> Result<CollectionEnvelope<u32>, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn unwraps_data() {
        assert_eq!(decode(json!({ "data": [1, 2, 3] })).unwrap().data, vec![1, 2, 3]);
    }

    #[test]
    fn missing_or_null_data_is_empty() {
        assert!(decode(json!({ "items": [1] })).unwrap().data.is_empty());
        assert!(decode(json!({ "data": null })).unwrap().data.is_empty());
        assert!(decode(Value::Null).unwrap().data.is_empty());
        assert!(decode(json!([1, 2])).unwrap().data.is_empty());
    }

    #[test]
    fn malformed_records_are_an_error() {
        assert!(decode(json!({ "data": ["one"] })).is_err());
        assert!(decode(json!({ "data": 5 })).is_err());
    }
}
