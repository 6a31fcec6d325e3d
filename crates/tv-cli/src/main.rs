//! CLI frontend for the Tavern dice roller and table shell.

mod commands;
mod diagnostics;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use tv_shell::ShellConfig;

#[derive(Parser)]
#[command(
    name = "tavern",
    about = "Tavern: dice notation, alarms and initiative for the game table",
    version,
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Dice notation to roll, shorthand for `tavern roll`
    notation: Vec<String>,

    /// Print the roll as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll dice notation once (e.g. 2d6+3, d20!, 4d6kh3)
    #[command(visible_alias = "r")]
    Roll {
        /// Dice notation; spaces are ignored
        #[arg(required = true)]
        notation: Vec<String>,

        /// Print the roll as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the interactive table shell (the default with no arguments)
    Shell {
        /// Number of rolls kept by `history`
        #[arg(long, default_value = "100")]
        history: usize,

        /// Drop the 🎲 / ⏰ line prefixes
        #[arg(long)]
        plain: bool,
    },
}

/// Log to stderr, filtered by `TAVERN_LOG` (default `warn`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("TAVERN_LOG").unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Roll { notation, json }) => commands::roll::run(&notation.join(" "), json),
        Some(Commands::Shell { history, plain }) => commands::shell::run(
            ShellConfig::default()
                .with_history_limit(history)
                .with_glyphs(!plain),
        ),
        None if !cli.notation.is_empty() => commands::roll::run(&cli.notation.join(" "), cli.json),
        None => commands::shell::run(ShellConfig::default()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
