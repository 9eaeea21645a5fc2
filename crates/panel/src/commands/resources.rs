//! Resource command handlers.
//!
//! One generic path per capability: every resource can be listed, and
//! writable resources additionally get create/update/delete.

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use panel_core::{
    AnalyticsEntry, Campaign, Collection, Contact, Funnel, MutationController, Order, Product,
    Resource, ResourceHooks, Subscription, Workflow, Writable,
};

use crate::cli::{
    AnalyticsArgs, AnalyticsCommand, GlobalOpts, ReadOnlyArgs, ReadOnlyCommand, WritableArgs,
    WritableCommand,
};
use crate::error::CliError;
use crate::output::{self, opt};

use super::{Context, util};

// ── Table rows ──────────────────────────────────────────────────────

/// How a record shows up in `list` output.
pub trait Listing: Serialize {
    type Row: Tabled;

    fn row(&self) -> Self::Row;
    fn id(&self) -> String;
}

#[derive(Tabled)]
pub struct FunnelRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Steps")]
    steps: String,
    #[tabled(rename = "Conversion")]
    conversion: String,
}

impl Listing for Funnel {
    type Row = FunnelRow;

    fn row(&self) -> FunnelRow {
        FunnelRow {
            id: self.id,
            name: self.name.clone(),
            status: opt(self.status.as_deref()),
            steps: opt(self.steps.as_ref()),
            conversion: self
                .conversion_rate
                .map(|r| format!("{r:.1}%"))
                .unwrap_or_default(),
        }
    }

    fn id(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Tabled)]
pub struct ProductRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Inventory")]
    inventory: String,
}

impl Listing for Product {
    type Row = ProductRow;

    fn row(&self) -> ProductRow {
        let price = match (self.price, self.currency.as_deref()) {
            (Some(p), Some(c)) => format!("{p:.2} {c}"),
            (Some(p), None) => format!("{p:.2}"),
            (None, _) => String::new(),
        };
        ProductRow {
            id: self.id,
            name: self.name.clone(),
            price,
            status: opt(self.status.as_deref()),
            inventory: opt(self.inventory.as_ref()),
        }
    }

    fn id(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Tabled)]
pub struct CampaignRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Sent")]
    sent: String,
    #[tabled(rename = "Open rate")]
    open_rate: String,
}

impl Listing for Campaign {
    type Row = CampaignRow;

    fn row(&self) -> CampaignRow {
        CampaignRow {
            id: self.id,
            name: self.name.clone(),
            subject: opt(self.subject.as_deref()),
            status: opt(self.status.as_deref()),
            sent: opt(self.sent.as_ref()),
            open_rate: self
                .open_rate
                .map(|r| format!("{r:.1}%"))
                .unwrap_or_default(),
        }
    }

    fn id(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Tabled)]
pub struct ContactRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl Listing for Contact {
    type Row = ContactRow;

    fn row(&self) -> ContactRow {
        ContactRow {
            id: self.id,
            name: self.name.clone(),
            email: opt(self.email.as_deref()),
            status: opt(self.status.as_deref()),
            tags: self.tags.join(", "),
        }
    }

    fn id(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Tabled)]
pub struct WorkflowRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Trigger")]
    trigger: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Steps")]
    steps: String,
}

impl Listing for Workflow {
    type Row = WorkflowRow;

    fn row(&self) -> WorkflowRow {
        WorkflowRow {
            id: self.id,
            name: self.name.clone(),
            trigger: opt(self.trigger.as_deref()),
            status: opt(self.status.as_deref()),
            steps: opt(self.steps.as_ref()),
        }
    }

    fn id(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Tabled)]
pub struct AnalyticsRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Funnel")]
    funnel: String,
}

impl Listing for AnalyticsEntry {
    type Row = AnalyticsRow;

    fn row(&self) -> AnalyticsRow {
        AnalyticsRow {
            metric: self.metric.clone(),
            value: opt(self.value.as_ref()),
            date: opt(self.date.as_deref()),
            funnel: opt(self.funnel_id.as_ref()),
        }
    }

    fn id(&self) -> String {
        self.metric.clone()
    }
}

#[derive(Tabled)]
pub struct SubscriptionRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Plan")]
    plan: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Renews")]
    renews_at: String,
}

impl Listing for Subscription {
    type Row = SubscriptionRow;

    fn row(&self) -> SubscriptionRow {
        SubscriptionRow {
            id: self.id,
            customer: opt(self.customer.as_deref()),
            plan: opt(self.plan.as_deref()),
            status: opt(self.status.as_deref()),
            amount: self.amount.map(|a| format!("{a:.2}")).unwrap_or_default(),
            renews_at: opt(self.renews_at.as_deref()),
        }
    }

    fn id(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Tabled)]
pub struct OrderRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Items")]
    items: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl Listing for Order {
    type Row = OrderRow;

    fn row(&self) -> OrderRow {
        OrderRow {
            id: self.id,
            customer: opt(self.customer.as_deref()),
            total: self.total.map(|t| format!("{t:.2}")).unwrap_or_default(),
            items: opt(self.items.as_ref()),
            status: opt(self.status.as_deref()),
            created_at: opt(self.created_at.as_deref()),
        }
    }

    fn id(&self) -> String {
        self.id.to_string()
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn writable<R>(
    ctx: &Context,
    hooks: ResourceHooks<R>,
    args: WritableArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    R: Writable,
    R::Record: Listing,
{
    ctx.require_session(global).await?;
    let kind = hooks.kind();

    match args.command {
        WritableCommand::List => list(hooks, global).await,

        WritableCommand::Create { payload } => {
            let body = util::read_payload(&payload)?;
            submit(&hooks.create(), Some(&body), &format!("Create {kind}"), global).await
        }

        WritableCommand::Update { id, payload } => {
            let body = util::read_payload(&payload)?;
            submit(&hooks.update(id), Some(&body), &format!("Update {kind} {id}"), global).await
        }

        WritableCommand::Delete { id } => {
            if !util::confirm(&format!("Delete {kind} {id}? This cannot be undone."), global.yes)? {
                return Ok(());
            }
            submit(&hooks.delete(id), None, &format!("Delete {kind} {id}"), global).await
        }
    }
}

pub async fn read_only<R>(
    ctx: &Context,
    hooks: ResourceHooks<R>,
    args: ReadOnlyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    R: Resource,
    R::Record: Listing,
{
    ctx.require_session(global).await?;
    match args.command {
        ReadOnlyCommand::List => list(hooks, global).await,
    }
}

pub async fn analytics(
    ctx: &Context,
    args: AnalyticsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.require_session(global).await?;
    match args.command {
        AnalyticsCommand::List { funnel } => {
            let spinner = util::spinner("Loading analytics…", global);
            let collection = ctx.console.analytics().list_for(funnel).await;
            spinner.finish_and_clear();
            render_collection(&collection, "List analytics", global)
        }
    }
}

async fn list<R>(hooks: ResourceHooks<R>, global: &GlobalOpts) -> Result<(), CliError>
where
    R: Resource,
    R::Record: Listing,
{
    let spinner = util::spinner(&format!("Loading {}…", hooks.kind()), global);
    let collection = hooks.list().await;
    spinner.finish_and_clear();
    render_collection(&collection, &format!("List {}", hooks.kind()), global)
}

fn render_collection<R>(
    collection: &Collection<R>,
    action: &str,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    R: Resource,
    R::Record: Listing,
{
    if let Some(message) = collection.error() {
        return Err(CliError::RequestFailed {
            action: action.into(),
            message,
        });
    }

    let items = collection.items();
    let out = output::render_list(&global.output, &items, |r| r.row(), |r| r.id())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn submit(
    mutation: &MutationController<Value>,
    body: Option<&Value>,
    action: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = util::spinner(&format!("{action}…"), global);
    let returned = match body {
        Some(body) => mutation.mutate(body).await,
        None => mutation.mutate_empty().await,
    };
    spinner.finish_and_clear();

    if let Some(message) = mutation.error() {
        return Err(CliError::RequestFailed {
            action: action.into(),
            message,
        });
    }

    if !global.quiet {
        eprintln!("{action}: done");
    }
    if let Some(data) = returned.filter(|v| !v.is_null()) {
        let out = output::render_single(
            &global.output,
            &data,
            |v| serde_json::to_string_pretty(v).unwrap_or_default(),
            |v| v.get("id").map(ToString::to_string).unwrap_or_default(),
        )?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}
