// ── Domain resource hooks ──
//
// Thin per-resource bindings over the generic controllers. Each resource
// gets one collection (a fetch controller on `/api/{kind}`) and, when it
// is writable, create/update/delete mutation controllers. Read-only
// resources simply do not implement `Writable`, so mutations on them do
// not compile.

pub mod envelope;
pub mod records;

use std::fmt::Debug;
use std::marker::PhantomData;

use panel_api::{ApiClient, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tokio::sync::watch;

pub use envelope::CollectionEnvelope;

use crate::controller::ControllerOptions;
use crate::fetch::{FetchController, FetchState};
use crate::mutation::MutationController;
use records::{AnalyticsEntry, Campaign, Contact, Funnel, Order, Product, Subscription, Workflow};

/// Every domain resource the backend exposes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Funnels,
    Products,
    Campaigns,
    Contacts,
    Workflows,
    Analytics,
    Subscriptions,
    Orders,
}

impl ResourceKind {
    /// `/api/{kind}`
    pub fn collection_path(self) -> String {
        format!("/api/{}", self.as_ref())
    }

    /// `/api/{kind}/{id}`
    pub fn item_path(self, id: u64) -> String {
        format!("/api/{}/{id}", self.as_ref())
    }

    /// Whether the backend accepts create/update/delete for this resource.
    pub fn is_writable(self) -> bool {
        !matches!(self, Self::Analytics | Self::Subscriptions | Self::Orders)
    }
}

/// A domain resource: its kind and the record type its collection holds.
pub trait Resource: Send + Sync + 'static {
    const KIND: ResourceKind;
    type Record: DeserializeOwned + Serialize + Clone + Debug + Send + Sync + 'static;
}

/// Marker for resources that accept create/update/delete.
pub trait Writable: Resource {}

macro_rules! resources {
    ($($(#[$doc:meta])* $name:ident => $kind:ident, $record:ty $(, $writable:ident)?;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $name;

            impl Resource for $name {
                const KIND: ResourceKind = ResourceKind::$kind;
                type Record = $record;
            }

            $(resources!(@$writable $name);)?
        )*
    };
    (@writable $name:ident) => {
        impl Writable for $name {}
    };
}

resources! {
    /// Sales funnels.
    Funnels => Funnels, Funnel, writable;
    /// Catalogue products.
    Products => Products, Product, writable;
    /// Email campaigns.
    Campaigns => Campaigns, Campaign, writable;
    /// CRM contacts.
    Contacts => Contacts, Contact, writable;
    /// Automation workflows.
    Workflows => Workflows, Workflow, writable;
    /// Analytics data points (read-only, optional funnel filter).
    Analytics => Analytics, AnalyticsEntry;
    /// Customer subscriptions (read-only).
    Subscriptions => Subscriptions, Subscription;
    /// Store orders (read-only).
    Orders => Orders, Order;
}

/// Analytics path, optionally filtered by funnel.
pub fn analytics_path(funnel_id: Option<u64>) -> String {
    match funnel_id {
        Some(id) => format!("{}?funnelId={id}", ResourceKind::Analytics.collection_path()),
        None => ResourceKind::Analytics.collection_path(),
    }
}

// ── Hooks ───────────────────────────────────────────────────────────

/// Entry point for one resource's controllers.
pub struct ResourceHooks<R> {
    client: ApiClient,
    options: ControllerOptions,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceHooks<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            options: self.options.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceHooks<R> {
    pub fn new(client: ApiClient, options: ControllerOptions) -> Self {
        Self {
            client,
            options,
            _resource: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    /// Mount the collection and perform its first load.
    pub async fn list(&self) -> Collection<R> {
        self.mount(R::KIND.collection_path()).await
    }

    async fn mount(&self, path: String) -> Collection<R> {
        let fetch = FetchController::mount(self.client.clone(), path, self.options.clone()).await;
        Collection {
            fetch,
            _resource: PhantomData,
        }
    }
}

impl<R: Writable> ResourceHooks<R> {
    /// `POST /api/{kind}`
    pub fn create(&self) -> MutationController<Value> {
        MutationController::with_method(
            self.client.clone(),
            R::KIND.collection_path(),
            Method::POST,
            self.options.clone(),
        )
    }

    /// `PUT /api/{kind}/{id}`
    pub fn update(&self, id: u64) -> MutationController<Value> {
        MutationController::with_method(
            self.client.clone(),
            R::KIND.item_path(id),
            Method::PUT,
            self.options.clone(),
        )
    }

    /// `DELETE /api/{kind}/{id}`
    pub fn delete(&self, id: u64) -> MutationController<Value> {
        MutationController::with_method(
            self.client.clone(),
            R::KIND.item_path(id),
            Method::DELETE,
            self.options.clone(),
        )
    }
}

impl ResourceHooks<Analytics> {
    /// Mount the analytics collection, filtered to one funnel when given.
    pub async fn list_for(&self, funnel_id: Option<u64>) -> Collection<Analytics> {
        self.mount(analytics_path(funnel_id)).await
    }
}

impl<R> Debug for ResourceHooks<R>
where
    R: Resource,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHooks")
            .field("kind", &R::KIND)
            .finish_non_exhaustive()
    }
}

// ── Collection ──────────────────────────────────────────────────────

/// A mounted resource collection.
pub struct Collection<R: Resource> {
    fetch: FetchController<CollectionEnvelope<R::Record>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            fetch: self.fetch.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Collection<R> {
    /// Loaded records; empty until a load succeeds.
    pub fn items(&self) -> Vec<R::Record> {
        self.fetch.data().map(|envelope| envelope.data).unwrap_or_default()
    }

    pub fn loading(&self) -> bool {
        self.fetch.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.fetch.error()
    }

    pub async fn refetch(&self) {
        self.fetch.refetch().await;
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<CollectionEnvelope<R::Record>>> {
        self.fetch.subscribe()
    }

    /// The underlying fetch controller.
    pub fn fetch(&self) -> &FetchController<CollectionEnvelope<R::Record>> {
        &self.fetch
    }
}

impl Collection<Analytics> {
    /// Re-target the funnel filter. Loads only if the path changed.
    pub async fn filter(&self, funnel_id: Option<u64>) -> bool {
        self.fetch.set_path(analytics_path(funnel_id)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn paths() {
        assert_eq!(ResourceKind::Funnels.collection_path(), "/api/funnels");
        assert_eq!(ResourceKind::Contacts.item_path(7), "/api/contacts/7");
        assert_eq!(analytics_path(None), "/api/analytics");
        assert_eq!(analytics_path(Some(4)), "/api/analytics?funnelId=4");
    }

    #[test]
    fn writable_kinds_match_marker_impls() {
        let writable: Vec<_> = ResourceKind::iter().filter(|k| k.is_writable()).collect();
        assert_eq!(
            writable,
            vec![
                Funnels::KIND,
                Products::KIND,
                Campaigns::KIND,
                Contacts::KIND,
                Workflows::KIND,
            ]
        );
    }

    #[test]
    fn kind_parses_from_name() {
        assert_eq!("orders".parse::<ResourceKind>().unwrap(), ResourceKind::Orders);
        assert_eq!(ResourceKind::Subscriptions.to_string(), "subscriptions");
    }
}
