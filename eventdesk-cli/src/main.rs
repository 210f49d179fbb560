mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use eventdesk_core::desk::EventDesk;
use eventdesk_core::store::{LoadStatus, backup_key};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::EventFields;

#[derive(Parser)]
#[command(name = "eventdesk")]
#[command(about = "Create, list, edit and delete your events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an event (prompts for anything not given as a flag)
    New {
        #[command(flatten)]
        fields: EventFields,
    },
    /// List stored events
    List {
        /// Show every field
        #[arg(short, long)]
        verbose: bool,
    },
    /// Change an existing event
    Edit {
        /// Event id, or a unique prefix of it
        id: String,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Delete an event
    Delete {
        /// Event id, or a unique prefix of it
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show where configuration and events are stored
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let desk = EventDesk::load()?;

    if let Commands::Config = cli.command {
        return commands::config::run(&desk);
    }

    debug!(path = %desk.events_file().display(), "opening event store");
    let (mut store, status) = desk.open_store();
    if let LoadStatus::Recovered(e) = status {
        eprintln!(
            "{}",
            format!(
                "Warning: {} could not be read ({e}). Starting with an empty event list; \
                 the old contents were kept in {}.",
                desk.events_file().display(),
                desk.storage().path_for(&backup_key(&desk.config().storage_key)).display()
            )
            .yellow()
        );
    }

    match cli.command {
        Commands::New { fields } => commands::new::run(&mut store, fields),
        Commands::List { verbose } => commands::list::run(&store, verbose),
        Commands::Edit { id, fields } => commands::edit::run(&mut store, &id, fields),
        Commands::Delete { id, force } => commands::delete::run(&mut store, &id, force),
        Commands::Config => commands::config::run(&desk),
    }
}
