//! Binary entrypoint for the Tinkertales CLI.
//!
//! Commands:
//! - `start` - run the Telegram bot until Ctrl-C
//! - `init [--item <name>...]` - create a starter `config.toml`, the data directory and optional catalog entries
//! - `status` - print player and item counts
//!
//! See the library crate docs for module-level details: `tinkertales::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::Path;

use tinkertales::bot::{BotContext, BotServer, LedgerSettings};
use tinkertales::config::Config;
use tinkertales::storage::Storage;

#[derive(Parser)]
#[command(name = "tinkertales")]
#[command(about = "A Telegram ledger bot for tabletop player balances and inventories")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Start,
    /// Write a default configuration and create the data directory
    Init {
        /// Seed the item catalog (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Show ledger status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init runs before a config exists
    let pre_config = match cli.command {
        Commands::Init { .. } => None,
        _ => Some(Config::load(&cli.config).await?),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Start => {
            let config = pre_config.ok_or_else(|| anyhow!("configuration not loaded"))?;
            info!("Starting Tinkertales v{}", env!("CARGO_PKG_VERSION"));
            let mut server = BotServer::new(config)?;
            server.run().await?;
        }
        Commands::Init { items, force } => {
            if Path::new(&cli.config).exists() && !force {
                return Err(anyhow!(
                    "{} already exists; pass --force to overwrite it",
                    cli.config
                ));
            }
            Config::create_default(&cli.config).await?;
            let config = Config::load(&cli.config).await?;
            let storage = Storage::open(config.general.data_dir())?;

            let mut ctx = BotContext::open(LedgerSettings::from(&config.general), storage)?;
            let added = ctx.seed_items(&items)?;

            println!("Created {}", cli.config);
            println!("Data directory: {}", config.general.data_dir());
            if added > 0 {
                println!("Added {} item(s) to the catalog", added);
            }
            println!("Set secrets.token, then run: tinkertales start");
        }
        Commands::Status => {
            let config = pre_config.ok_or_else(|| anyhow!("configuration not loaded"))?;
            let server = BotServer::new(config)?;
            server.show_status();
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Mirror to the console only in the foreground
        let is_tty = atty::is(atty::Stream::Stdout);

        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());

            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }

            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }

    let _ = builder.try_init();
}
