//! Session command handlers: login, logout, whoami.

use owo_colors::OwoColorize;
use secrecy::SecretString;

use panel_core::{AuthState, User};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

pub async fn login(ctx: &Context, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let token = match args.token {
        Some(token) => token,
        None => rpassword::prompt_password("Session token: ")?,
    };
    let token = token.trim().to_owned();
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "session token cannot be empty".into(),
        });
    }

    let spinner = util::spinner("Validating token…", global);
    let result = ctx
        .console
        .session()
        .login_with_token(SecretString::from(token))
        .await;
    spinner.finish_and_clear();

    let user = result?;
    if !global.quiet {
        eprintln!(
            "Signed in as {} (profile '{}')",
            user.display_name(),
            ctx.profile
        );
    }
    Ok(())
}

pub async fn logout(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.console.session().logout().await;
    if !global.quiet {
        eprintln!("Signed out (profile '{}')", ctx.profile);
    }
    Ok(())
}

pub async fn whoami(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.require_session(global).await?;

    let AuthState::Authenticated(user) = ctx.console.session().state() else {
        return Err(CliError::NotSignedIn {
            profile: ctx.profile.clone(),
        });
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &user,
        |u| user_detail(u, color),
        |u| u.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn user_detail(user: &User, color: bool) -> String {
    let state = if color {
        "authenticated".green().to_string()
    } else {
        "authenticated".to_owned()
    };
    let role = if color {
        user.role.cyan().to_string()
    } else {
        user.role.clone()
    };

    [
        format!("Session: {state}"),
        format!("ID:      {}", user.id),
        format!("Name:    {}", user.name),
        format!("Email:   {}", user.email),
        format!("Role:    {role}"),
    ]
    .join("\n")
}
