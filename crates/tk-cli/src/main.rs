//! `tk`: command-line table companion for D&D 5e game masters.

mod commands;
mod config;
mod shell;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::campaign::CampaignAction;
use crate::commands::character::CharacterAction;
use crate::commands::notes::{EventAction, LocationAction, NpcAction, QuestAction};
use crate::commands::image::ImageAction;
use crate::commands::reference::RefAction;
use crate::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "tk",
    about = "Tablekeeper: campaigns, characters, reference data, and encounters for D&D 5e",
    version,
    propagate_version = true
)]
struct Cli {
    /// Database file (overrides the configured path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Configuration file (default: ./tablekeeper.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list, show, edit, or delete campaigns
    Campaign {
        #[command(subcommand)]
        action: CampaignAction,
    },

    /// Track quests within a campaign
    Quest {
        #[command(subcommand)]
        action: QuestAction,
    },

    /// Record places in a campaign
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Record non-player characters in a campaign
    Npc {
        #[command(subcommand)]
        action: NpcAction,
    },

    /// Record story events in a campaign
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Attach maps and handouts to a campaign
    Image {
        #[command(subcommand)]
        action: ImageAction,
    },

    /// Manage player character sheets
    Character {
        #[command(subcommand)]
        action: CharacterAction,
    },

    /// Roll dice, e.g. `tk roll 2d6+3` or `tk roll d20 --adv`
    Roll {
        /// Dice expression: [count]d<sides>[+/-modifier]
        expr: String,

        /// Roll twice and keep the higher total
        #[arg(long)]
        adv: bool,

        /// Roll twice and keep the lower total
        #[arg(long)]
        dis: bool,

        /// RNG seed for a reproducible roll
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Roll an ability check, saving throw, or skill check for a character
    Check {
        /// Character id
        character: i64,

        /// STR, save:DEX, Stealth, ...
        check: String,

        /// Roll with advantage
        #[arg(long)]
        adv: bool,

        /// Roll with disadvantage
        #[arg(long)]
        dis: bool,

        /// RNG seed for a reproducible roll
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Search, show, look up, and import creatures, spells, and items
    Ref {
        #[command(subcommand)]
        action: RefAction,
    },

    /// Export the whole database to a zip archive
    Export {
        /// Output file (default: tablekeeper_export_<timestamp>.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore a zip archive produced by `tk export`
    Restore {
        /// Archive to restore
        file: PathBuf,
    },

    /// Run an interactive encounter tracker
    Encounter {
        /// RNG seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let db = cli.db.as_deref();

    match cli.command {
        Commands::Roll {
            expr,
            adv,
            dis,
            seed,
        } => commands::roll::run(&config, &expr, adv, dis, seed),
        Commands::Check {
            character,
            check,
            adv,
            dis,
            seed,
        } => {
            let store = commands::open_store(&config, db).await?;
            commands::roll::check(&store, &config, character, &check, adv, dis, seed).await
        }
        Commands::Campaign { action } => {
            let store = commands::open_store(&config, db).await?;
            commands::campaign::run(&store, action).await
        }
        Commands::Quest { action } => {
            let store = commands::open_store(&config, db).await?;
            commands::notes::quest(&store, action).await
        }
        Commands::Location { action } => {
            let store = commands::open_store(&config, db).await?;
            commands::notes::location(&store, action).await
        }
        Commands::Npc { action } => {
            let store = commands::open_store(&config, db).await?;
            commands::notes::npc(&store, action).await
        }
        Commands::Event { action } => {
            let store = commands::open_store(&config, db).await?;
            commands::notes::event(&store, action).await
        }
        Commands::Image { action } => {
            let store = commands::open_store(&config, db).await?;
            commands::image::run(&store, action).await
        }
        Commands::Character { action } => {
            let store = commands::open_store(&config, db).await?;
            commands::character::run(&store, action).await
        }
        Commands::Ref { action } => {
            let store = commands::open_store(&config, db).await?;
            commands::reference::run(&store, &config, action).await
        }
        Commands::Export { output } => {
            let store = commands::open_store(&config, db).await?;
            commands::archive::export(&store, output.as_deref()).await
        }
        Commands::Restore { file } => {
            let store = commands::open_store(&config, db).await?;
            commands::archive::restore(&store, &file).await
        }
        Commands::Encounter { seed } => {
            let store = commands::open_store(&config, db).await?;
            commands::encounter::run(store, &config, seed).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
