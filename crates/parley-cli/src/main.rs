use anyhow::Result;
use clap::{Parser, Subcommand};
use parley_core::conversation::ConversationSort;
use std::path::PathBuf;

mod commands;
mod context;
mod logging;

use commands::session::RoleArg;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley - saved conversations and live session for a chat assistant")]
#[command(long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding the stored conversations
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true, conflicts_with = "data_dir")]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved conversations
    List {
        /// created, recent, name or messages
        #[arg(long, default_value_t = ConversationSort::CreatedDesc)]
        sort: ConversationSort,
    },
    /// Print the messages of a saved conversation
    Show { id: String },
    /// Save the current session under a name
    Save { name: String },
    /// Rename a saved conversation
    Rename { id: String, name: String },
    /// Delete a saved conversation
    Delete { id: String },
    /// Print the current session
    Current,
    /// Append a message to the current session and persist it
    Say {
        text: String,
        #[arg(long, value_enum, default_value_t = RoleArg::User)]
        role: RoleArg,
        /// Image reference attached to the message
        #[arg(long, value_name = "URI")]
        image: Option<String>,
    },
    /// Start a new chat
    New,
    /// Make a saved conversation the current session
    Open { id: String },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Write the default config file if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = context::config_service(cli.config.as_deref())?;
    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Path => commands::config::path(&config_service),
            ConfigAction::Init => commands::config::init(&config_service),
        };
    }

    let config = context::load_config(&config_service, cli.data_dir)?;
    let _log_guard = logging::init(&config.logging)?;
    let services = context::build_services(&config, cli.ephemeral).await?;

    match cli.command {
        Commands::List { sort } => commands::conversations::list(&services, sort).await,
        Commands::Show { id } => commands::conversations::show(&services, &id).await?,
        Commands::Save { name } => commands::conversations::save(&services, &name).await?,
        Commands::Rename { id, name } => {
            commands::conversations::rename(&services, &id, &name).await?
        }
        Commands::Delete { id } => commands::conversations::delete(&services, &id).await?,
        Commands::Current => commands::session::current(&services).await,
        Commands::Say { text, role, image } => {
            commands::session::say(&services, &text, role, image).await?
        }
        Commands::New => commands::session::new_chat(&services).await,
        Commands::Open { id } => commands::session::open(&services, &id).await?,
        // Handled before the services are built.
        Commands::Config { .. } => {}
    }

    Ok(())
}
