//! # byklab
//!
//! Command-line front end for the BYKLAB client: restores the persisted
//! session, talks to the backend, and reports access decisions as JSON.

#![deny(unsafe_code)]

mod app;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::app::App;

/// BYKLAB subscription access client.
#[derive(Parser, Debug)]
#[command(name = "byklab", about = "BYKLAB subscription access client")]
struct Cli {
    /// Settings file (defaults to `~/.byklab/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Directory holding the session record (overrides settings).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Backend base URL (overrides settings).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log level (overrides settings; `RUST_LOG` wins when set).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Create an account and log in.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Full name shown in the app.
        #[arg(long)]
        name: String,
    },
    /// Log in with existing credentials.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the current session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Check whether the current user may use a feature.
    Check {
        /// Feature identifier, e.g. `video-carousel`.
        feature: String,
    },
    /// List features a tier unlocks (defaults to the current user's tier).
    Features {
        #[arg(long)]
        tier: Option<String>,
    },
    /// Show what navigating to a path would render.
    Visit {
        /// Destination path, e.g. `/dashboard`.
        path: String,
    },
    /// List subscription plans.
    Plans {
        /// Use the built-in catalog instead of asking the backend.
        #[arg(long)]
        offline: bool,
    },
    /// Show where choosing a plan leads.
    Select {
        /// Plan id or name.
        plan: String,
        #[arg(long)]
        offline: bool,
    },
    /// Pay for a plan and upgrade the session.
    Purchase {
        /// Plan id or name.
        plan: String,
        #[arg(long)]
        card_number: String,
        #[arg(long)]
        card_name: String,
        /// Expiry as `MM/YY`.
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        cvv: String,
    },
}

impl Cli {
    fn load_settings(&self) -> Result<byklab_settings::ByklabSettings> {
        let path = self
            .settings
            .clone()
            .unwrap_or_else(byklab_settings::settings_path);
        let mut settings = byklab_settings::load_settings_from_path(&path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?;

        if let Some(dir) = &self.data_dir {
            settings.storage.data_dir = Some(dir.to_string_lossy().into_owned());
        }
        if let Some(url) = &self.api_url {
            settings.api.base_url.clone_from(url);
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        settings.validate().context("invalid command-line override")?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.load_settings()?;
    byklab_core::logging::init_subscriber(&settings.logging.level);
    debug!(data_dir = %settings.storage.resolved_data_dir().display(), "starting");

    let app = App::open(settings);
    let output = app.run(cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
