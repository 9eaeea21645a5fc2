//! Config subcommand handlers.

use dialoguer::{Input, Select};

use panel_config::{Config, CredentialBackend, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = panel_config::load_config_or_default();
            let out = match global.output {
                crate::cli::OutputFormat::Table | crate::cli::OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(|e| CliError::Config {
                        message: e.to_string(),
                    })?
                }
                _ => output::render_single(&global.output, &cfg, |_| String::new(), |_| String::new())?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&panel_config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = panel_config::load_config_or_default();
            let default = config::active_profile_name(global, &cfg);
            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort_unstable();

            let out = names
                .into_iter()
                .map(|name| {
                    let marker = if *name == default { "*" } else { " " };
                    format!("{marker} {name}  {}", cfg.profiles[name].api_url)
                })
                .collect::<Vec<_>>()
                .join("\n");
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = panel_config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            panel_config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

/// Interactive wizard: writes one profile to the config file.
fn init() -> Result<(), CliError> {
    let config_path = panel_config::config_path();
    eprintln!("panel: configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let api_url: String = Input::new()
        .with_prompt("Backend URL")
        .default(panel_config::DEFAULT_API_URL.into())
        .interact_text()
        .map_err(prompt_err)?;

    if url::Url::parse(&api_url).is_err() {
        return Err(CliError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {api_url}"),
        });
    }

    let store_choices = &[
        "File in the user data directory (default)",
        "System keyring",
        "Memory only (sign in on every run)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where should the session token be kept?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    let credential_store = match store_selection {
        1 => CredentialBackend::Keyring,
        2 => CredentialBackend::Memory,
        _ => CredentialBackend::File,
    };

    let mut cfg: Config = panel_config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            api_url,
            credential_store: Some(credential_store),
            ..Profile::default()
        },
    );
    if cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }

    let path = panel_config::save_config(&cfg)?;
    eprintln!("\n   Profile '{profile_name}' saved to {}", path.display());
    eprintln!("   Next: panel login --profile {profile_name}");
    Ok(())
}
