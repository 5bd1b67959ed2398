use std::path::PathBuf;

use anyhow::Context;
use bikes_store::{app_config::Config, CatalogSession};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "bikes")]
#[command(about = "Parts and compounds catalog for the bike shop", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalog file; defaults to `catalog.path` from the configuration
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every item in ID order
    List {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a single item
    Show { id: String },

    /// Print the derived cost of an item
    Cost { id: String },

    /// Print the IDs an item directly depends on
    Deps { id: String },

    /// Print the IDs of the items that use an item
    UsedBy { id: String },

    /// Add a new part
    AddPart {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        cost: Option<i64>,
    },

    /// Add a new compound
    AddCompound {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Components as `ID:qty,ID:qty`
        #[arg(long)]
        components: Option<String>,
    },

    /// Rename an item
    Rename { id: String, name: String },

    /// Set the unit cost of a part
    SetCost {
        id: String,
        #[arg(allow_hyphen_values = true)]
        cost: i64,
    },

    /// Replace the components of a compound, e.g. `SP1:32,RM1:1`
    SetComponents { id: String, spec: String },

    /// Remove an item no compound uses
    Remove { id: String },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

impl Commands {
    fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Commands::List { .. }
                | Commands::Show { .. }
                | Commands::Cost { .. }
                | Commands::Deps { .. }
                | Commands::UsedBy { .. }
        )
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("Failed to load config")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = cli
        .file
        .or(config.catalog.path)
        .context("No catalog file: pass --file or set catalog.path")?;

    let mut session = CatalogSession::new();
    if cli.command.is_mutating() && !path.exists() {
        tracing::info!("{} does not exist yet, starting an empty catalog", path.display());
    } else {
        session.open(&path)?;
    }

    let mutating = cli.command.is_mutating();
    commands::run(&mut session, cli.command)?;

    if mutating {
        session.save(&path)?;
    }
    Ok(())
}
