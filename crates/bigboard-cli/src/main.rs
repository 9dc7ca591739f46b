mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, webhooks::WebhooksSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bigboard",
    about = "Keep Trello big board stickers in sync with the ||GPRWY|| markers in card descriptions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: nearest bigboard.yaml, then ~/.config/bigboard.yaml)
    #[arg(long, global = true, env = "BIGBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server
    Serve {
        /// Port to listen on (default: server.port from the config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Register the board webhook, load the sticker catalog, and sync the primary board
    Setup,

    /// Sync one card's stickers
    Sync {
        /// Trello card id
        card_id: String,
    },

    /// Sync every card on a configured board
    SyncBoard {
        /// Board name from `boards:` (default: primary_board)
        name: Option<String>,
    },

    /// Show the resolved sticker catalog
    Stickers,

    /// Inspect and register Trello webhooks
    Webhooks {
        #[command(subcommand)]
        subcommand: WebhooksSubcommand,
    },

    /// Add a project proposal card to the proposals board
    Propose {
        /// Card name
        name: String,
        /// Card description (markdown)
        #[arg(long, default_value = "")]
        desc: String,
    },

    /// Show, validate, or create the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } | Commands::Setup => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve { port } => cmd::serve::run(config, port),
        Commands::Setup => cmd::setup::run(config, cli.json),
        Commands::Sync { card_id } => cmd::sync::run_card(config, &card_id, cli.json),
        Commands::SyncBoard { name } => cmd::sync::run_board(config, name.as_deref(), cli.json),
        Commands::Stickers => cmd::stickers::run(config, cli.json),
        Commands::Webhooks { subcommand } => cmd::webhooks::run(config, subcommand, cli.json),
        Commands::Propose { name, desc } => cmd::propose::run(config, &name, &desc, cli.json),
        Commands::Config { subcommand } => cmd::config::run(config, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
