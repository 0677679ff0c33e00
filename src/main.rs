//! `capdir` - terminal client for the capability directory
//!
//! Browse capabilities with search, filters and sorting, and register or
//! unregister consultants against the directory service.

use anyhow::{Context, Result};
use clap::Parser;
use console::Style;
use std::sync::Arc;

use crate::cli::{Cli, Commands};
use crate::output::OutputFormatter;
use capdir_core::config::{self, Config};
use capdir_core::model::Snapshot;
use capdir_core::registry::{HttpBackend, Mutation, RegistryClient};
use capdir_core::render::{self, LoadState, RenderInput};
use capdir_core::{info_log, query};

mod cli;
mod output;
mod tui;

/// Main entry point for the capability directory CLI
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        let blue = Style::new().blue();
        println!(
            "{} v{} ({})",
            blue.apply_to("capdir"),
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH")
        );
        return Ok(());
    }

    let formatter = OutputFormatter::new();

    // Load configuration: file, then environment, then command line
    let mut config = Config::load_or_default().context("Failed to load configuration")?;
    config.apply_env();
    let config = config.with_base_url(cli.base_url.clone());
    config.validate().context("Invalid configuration")?;

    capdir_core::logger::init(config.logging.log_dir(), config.logging.level_filter());

    let backend = HttpBackend::from_config(&config.backend)
        .context("Failed to create HTTP client")?;
    info_log!("capdir {} using {}", env!("CARGO_PKG_VERSION"), backend.base_url());
    let client = RegistryClient::new(Arc::new(backend));

    match cli.command {
        None | Some(Commands::Tui) => {
            tui::run_tui(&config, client).await?;
        }

        Some(Commands::List { filters, json }) => {
            let snapshot = client.fetch_snapshot().await.map_err(|err| {
                anyhow::anyhow!("Failed to load capabilities: {}", err.user_message())
            })?;
            let criteria = filters.into_criteria(config.ui.default_sort_key());

            if json {
                let selected: Snapshot = query::apply(&snapshot, &criteria)
                    .into_iter()
                    .map(|(name, capability)| (name.to_string(), capability.clone()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&selected)?);
            } else {
                let view = render::render(RenderInput {
                    epoch: 0,
                    snapshot: &snapshot,
                    criteria: &criteria,
                    load_state: LoadState::Loaded,
                    feedback: None,
                    pending: false,
                });
                formatter.print_listing(&view);
            }
        }

        Some(Commands::Register { capability, email }) => {
            mutate(&client, &formatter, Mutation::Register, &capability, &email).await?;
        }

        Some(Commands::Unregister { capability, email }) => {
            mutate(&client, &formatter, Mutation::Unregister, &capability, &email).await?;
        }

        Some(Commands::Config { path }) => {
            let source = config::find_config_file();
            if path {
                match source.or_else(Config::default_path) {
                    Some(p) => println!("{}", p.display()),
                    None => anyhow::bail!("No configuration directory available"),
                }
            } else {
                formatter.print_config(&config, source.as_deref());
                println!();
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

/// Run one register/unregister call and report it. A failed call is a
/// non-zero exit.
async fn mutate(
    client: &RegistryClient,
    formatter: &OutputFormatter,
    mutation: Mutation,
    capability: &str,
    email: &str,
) -> Result<()> {
    let email = email.trim();
    if capability.trim().is_empty() {
        anyhow::bail!(capdir_core::controller::SELECT_CAPABILITY_PROMPT);
    }
    if email.is_empty() {
        anyhow::bail!(capdir_core::controller::ENTER_EMAIL_PROMPT);
    }

    let outcome = client.mutate(mutation, capability, email).await;
    formatter.print_outcome(&outcome);
    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
