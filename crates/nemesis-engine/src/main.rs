//! `nemesis` command-line advisor.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nemesis_engine::{open_session, AdvisorConfig, Command, OutputFormat};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "nemesis",
    version,
    about = "Tells you which Archnemesis recipes to build next"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to nemesis.toml in the platform config dir)
    #[arg(long, global = true, env = "NEMESIS_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog file or directory (overrides config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory holding inventory.json and queue.json (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current recommendation
    Show,
    /// List held items
    Inventory,
    /// Set the held count of an item
    Set {
        /// Item name
        item: String,
        /// New count
        count: u32,
    },
    /// Add one of an item
    Inc {
        /// Item name
        item: String,
    },
    /// Remove one of an item
    Dec {
        /// Item name
        item: String,
    },
    /// Queue drops to add on the next flush
    Drop {
        /// Drop names
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Add every queued drop to the inventory
    Flush,
    /// Discard queued drops
    Clear,
    /// Apply the current recommendation
    Consume,
    /// Start an interactive session
    Session,
    /// Print the resolved configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        write: bool,
    },
}

impl Commands {
    fn into_command(self) -> Option<Command> {
        Some(match self {
            Self::Show => Command::Show,
            Self::Inventory => Command::Inventory,
            Self::Set { item, count } => Command::Set { item, count },
            Self::Inc { item } => Command::Inc(item),
            Self::Dec { item } => Command::Dec(item),
            Self::Drop { items } => Command::Drop(items),
            Self::Flush => Command::Flush,
            Self::Clear => Command::Clear,
            Self::Consume => Command::Consume,
            Self::Session | Self::Config { .. } => return None,
        })
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.unwrap_or_else(AdvisorConfig::config_path);
    let mut config = AdvisorConfig::load_from(&config_path);
    config.apply_overrides(cli.catalog, cli.data_dir);
    debug!(?config, "Resolved configuration");

    let command = cli.command.unwrap_or(Commands::Show);
    if let Commands::Config { write } = command {
        print!("{}", toml::to_string_pretty(&config)?);
        if write {
            config
                .save_to(&config_path)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            eprintln!("Wrote {}", config_path.display());
        }
        return Ok(());
    }

    let mut session = open_session(&config, cli.format).context("Failed to open advisor")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command.into_command() {
        Some(command) => {
            session.execute(&command, &mut out)?;
            session.save().context("Failed to save inventory")?;
        },
        None => session.run(io::stdin().lock(), &mut out)?,
    }
    Ok(())
}
