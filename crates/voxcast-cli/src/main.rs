//! Voxcast CLI - text-to-speech with voice-character presets.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod style;

use config::Config;
use error::CliError;
use style::Theme;

#[derive(Debug, Parser)]
#[command(
    name = "voxcast",
    about = "Turn text into speech with voice-character presets",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to a config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Synthesize speech from text and write it to a file
    Speak(commands::speak::SpeakArgs),
    /// List the available voice presets
    Presets,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxcast=warn,voxcast_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let theme = if cli.no_color {
        Theme::no_color()
    } else {
        Theme::default()
    };

    let config = match Config::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            theme.warning(&format!("Ignoring unreadable config: {}", CliError::from(err)));
            Config::default()
        }
    };

    let result = match cli.command {
        Command::Speak(args) => commands::speak::execute(args, &config, &theme).await,
        Command::Presets => commands::presets::execute(&theme),
    };

    if let Err(err) = result {
        theme.error(&err.to_string());
        std::process::exit(1);
    }
}
