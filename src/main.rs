mod cli;
mod tui;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;

use ramadan_time::alerts::DesktopNotifier;
use ramadan_time::config::{FileSettingsStore, SettingsStore};
use ramadan_time::daemon::Daemon;
use ramadan_time::prayer_times::{PrayerTimeProvider, SalahProvider};

use cli::args::{Cli, Commands};
use cli::handlers;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let store = Arc::new(
        FileSettingsStore::open_default()
            .await
            .context("Locating the settings directory")?,
    );
    let provider: Arc<dyn PrayerTimeProvider> = Arc::new(SalahProvider);

    match cli.command {
        Some(Commands::Setup { reset }) => {
            handlers::handle_setup(&store, reset).await?;
        }

        // These work without a configured location
        Some(Commands::Config { action }) => {
            handlers::handle_config(&store, action).await?;
        }
        Some(Commands::Daemon) => {
            if !store.exists().await {
                log::info!("no settings at {:?} yet; treating this as a fresh install", store.path());
            }
            Daemon::new(store, provider, Arc::new(DesktopNotifier))
                .run(ctrl_c())
                .await;
        }
        Some(Commands::Alarms) => {
            handlers::handle_alarms(store, provider).await?;
        }

        Some(Commands::Times { json }) => {
            ensure_setup(&store).await?;
            handlers::handle_times(&store, provider.as_ref(), json).await?;
        }

        // No subcommand → launch TUI
        None => {
            ensure_setup(&store).await?;
            tui::app::run(store, provider).await?;
        }
    }

    Ok(())
}

/// Run the wizard when no location has been chosen yet.
async fn ensure_setup(store: &FileSettingsStore) -> Result<()> {
    if store.get().await.needs_onboarding() {
        eprintln!("No location configured. Running setup...");
        eprintln!();
        if !handlers::handle_setup(store, false).await? {
            bail!("Setup cancelled");
        }
    }
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
