//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod config_cmd;
pub mod resources;
pub mod session;
pub mod util;

use panel_core::{AuthState, Console};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// A console plus the profile it was built for.
pub struct Context {
    pub console: Console,
    pub profile: String,
}

impl Context {
    /// Resolve config + flags and open the profile's credential store.
    pub fn build(global: &GlobalOpts) -> Result<Self, CliError> {
        let resolved = config::resolve(global)?;
        let store = panel_config::open_credential_store(resolved.backend, &resolved.profile_name)?;
        tracing::debug!(
            profile = %resolved.profile_name,
            backend = %resolved.backend,
            url = %resolved.console.base_url,
            "console configured"
        );
        let console = Console::new(resolved.console, store)?;
        Ok(Self {
            console,
            profile: resolved.profile_name,
        })
    }

    /// Restore the stored session, failing if nobody is signed in.
    pub async fn require_session(&self, global: &GlobalOpts) -> Result<(), CliError> {
        let spinner = util::spinner("Checking session…", global);
        let state = self.console.start().await;
        spinner.finish_and_clear();

        match state {
            AuthState::Authenticated(_) => Ok(()),
            AuthState::Unauthenticated | AuthState::Validating => Err(CliError::NotSignedIn {
                profile: self.profile.clone(),
            }),
        }
    }
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let ctx = Context::build(global)?;

    match cmd {
        Command::Login(args) => session::login(&ctx, args, global).await,
        Command::Logout => session::logout(&ctx, global).await,
        Command::Whoami => session::whoami(&ctx, global).await,

        Command::Funnels(args) => resources::writable(&ctx, ctx.console.funnels(), args, global).await,
        Command::Products(args) => {
            resources::writable(&ctx, ctx.console.products(), args, global).await
        }
        Command::Campaigns(args) => {
            resources::writable(&ctx, ctx.console.campaigns(), args, global).await
        }
        Command::Contacts(args) => {
            resources::writable(&ctx, ctx.console.contacts(), args, global).await
        }
        Command::Workflows(args) => {
            resources::writable(&ctx, ctx.console.workflows(), args, global).await
        }

        Command::Analytics(args) => resources::analytics(&ctx, args, global).await,
        Command::Subscriptions(args) => {
            resources::read_only(&ctx, ctx.console.subscriptions(), args, global).await
        }
        Command::Orders(args) => {
            resources::read_only(&ctx, ctx.console.orders(), args, global).await
        }

        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
