// ── Lenient field decoding ──
//
// Backends written in loosely typed languages send `null` where a field
// has no value. `#[serde(default)]` only covers an absent key, so fields
// that default also route through `null_as_default`.

use serde::{Deserialize, Deserializer};

/// Decode `null` (or an absent key, with `#[serde(default)]`) as `T::default()`.
///
/// ```ignore
/// #[serde(default, deserialize_with = "panel_api::decode::null_as_default")]
/// pub name: String,
/// ```
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::null_as_default;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "null_as_default")]
        label: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn null_and_missing_both_default() {
        let nulls: Sample = serde_json::from_value(json!({ "label": null, "tags": null })).unwrap();
        let missing: Sample = serde_json::from_value(json!({})).unwrap();

        assert_eq!(nulls.label, "");
        assert!(nulls.tags.is_empty());
        assert_eq!(missing.label, "");
        assert!(missing.tags.is_empty());
    }

    #[test]
    fn wrong_type_still_fails() {
        assert!(serde_json::from_value::<Sample>(json!({ "label": 5 })).is_err());
    }
}
