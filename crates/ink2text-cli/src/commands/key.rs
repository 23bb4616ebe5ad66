//! Key command - edit the stored API key.

use clap::{Args, Subcommand};
use console::style;

use ink2text_core::settings::mask_credential;

use super::ConfigDirs;

/// Arguments for the key command.
#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    command: KeyCommand,
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Store the API key
    Set {
        /// Gemini API key
        key: String,
    },

    /// Show the stored API key, masked
    Show,

    /// Remove the stored API key
    Clear,
}

pub fn run(args: KeyArgs, dirs: &ConfigDirs) -> anyhow::Result<()> {
    let mut settings = dirs.load_settings();

    match args.command {
        KeyCommand::Set { key } => {
            settings.set_credential(&key)?;
            println!(
                "{} API key saved to {}",
                style("✓").green(),
                dirs.settings_path().display()
            );
        }
        KeyCommand::Show => match settings.credential() {
            Some(key) => println!("{}", mask_credential(key)),
            None => {
                println!("{}", style("No API key stored").yellow());
                println!();
                println!("Run 'ink2text key set <KEY>' or set GEMINI_API_KEY.");
            }
        },
        KeyCommand::Clear => {
            settings.clear_credential()?;
            println!("{} API key removed", style("✓").green());
        }
    }

    Ok(())
}
