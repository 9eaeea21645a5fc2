// ── Domain records ──
//
// Read projections of backend state. Every field except `id` defaults,
// whether the key is absent or `null`, and unknown fields survive in
// `extra`, so the types tolerate a loosely typed backend in both
// directions.

use panel_api::decode::null_as_default;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sales funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funnel {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub steps: Option<u32>,
    #[serde(default)]
    pub conversion_rate: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Catalogue product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub inventory: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Email marketing campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sent: Option<u64>,
    #[serde(default)]
    pub open_rate: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// CRM contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Automation workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub steps: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One analytics data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub funnel_id: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Customer subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: u64,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub renews_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Store order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u64,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub items: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_fields_default() {
        let funnel: Funnel = serde_json::from_value(json!({ "id": 4 })).unwrap();
        assert_eq!(funnel.id, 4);
        assert_eq!(funnel.name, "");
        assert!(funnel.status.is_none());
        assert!(funnel.extra.is_empty());
    }

    #[test]
    fn null_fields_default() {
        let funnel: Funnel =
            serde_json::from_value(json!({ "id": 2, "name": null, "status": null })).unwrap();
        let contact: Contact =
            serde_json::from_value(json!({ "id": 3, "name": "Ada", "tags": null })).unwrap();
        let entry: AnalyticsEntry =
            serde_json::from_value(json!({ "id": null, "metric": null, "value": 3.5 })).unwrap();

        assert_eq!(funnel.name, "");
        assert!(funnel.status.is_none());
        assert!(contact.tags.is_empty());
        assert_eq!(entry.id, 0);
        assert_eq!(entry.metric, "");
        assert_eq!(entry.value, Some(3.5));
    }

    #[test]
    fn null_id_is_rejected_on_addressable_records() {
        assert!(serde_json::from_value::<Funnel>(json!({ "id": null, "name": "A" })).is_err());
    }

    #[test]
    fn camel_case_and_extra_fields() {
        let order: Order = serde_json::from_value(json!({
            "id": 12,
            "customer": "Acme",
            "total": 99.5,
            "createdAt": "2024-06-15",
            "channel": "web"
        }))
        .unwrap();

        assert_eq!(order.created_at.as_deref(), Some("2024-06-15"));
        assert_eq!(order.extra.get("channel"), Some(&json!("web")));
    }

    #[test]
    fn id_is_required_on_addressable_records() {
        assert!(serde_json::from_value::<Contact>(json!({ "name": "Ada" })).is_err());
        assert!(serde_json::from_value::<AnalyticsEntry>(json!({ "metric": "visits" })).is_ok());
    }
}
