// panel-core: Session lifecycle and data-access controllers between panel-api and consumers (CLI/UI).

pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod mutation;
pub mod resource;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, OfflinePolicy, SettlementOrder, TlsVerification};
pub use console::Console;
pub use controller::ControllerOptions;
pub use error::CoreError;
pub use fetch::{FetchController, FetchState};
pub use mutation::{MutationController, MutationState};
pub use resource::{
    Analytics, Campaigns, Collection, CollectionEnvelope, Contacts, Funnels, Orders, Products,
    Resource, ResourceHooks, ResourceKind, Subscriptions, Workflows, Writable,
};
pub use resource::records::{
    AnalyticsEntry, Campaign, Contact, Funnel, Order, Product, Subscription, Workflow,
};
pub use session::{AuthState, SessionManager};

// Transport-level types consumers need to wire a console together.
pub use panel_api::{CredentialStore, MemoryCredentialStore, User, UserId};
