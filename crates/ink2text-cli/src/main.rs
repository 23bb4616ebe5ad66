//! CLI application for converting photographed handwritten rate lists.

mod commands;
mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, convert, key, render};

/// Ink to Text - Turn a photo of a handwritten rate list into a document
#[derive(Parser)]
#[command(name = "ink2text")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding config.json and the stored API key
    #[arg(long, global = true, env = "INK2TEXT_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a photographed note
    Convert(convert::ConvertArgs),

    /// Render or export a previously saved result
    Render(render::RenderArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Manage the stored API key
    Key(key::KeyArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let dirs = commands::ConfigDirs::resolve(cli.config_dir);

    match cli.command {
        Commands::Convert(args) => convert::run(args, &dirs).await,
        Commands::Render(args) => render::run(args, &dirs),
        Commands::Config(args) => config::run(args, &dirs),
        Commands::Key(args) => key::run(args, &dirs),
    }
}
