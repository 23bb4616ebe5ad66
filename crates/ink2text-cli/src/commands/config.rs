//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use ink2text_core::AppConfig;

use super::{ConfigDirs, load_config_from};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "service.model")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, dirs: &ConfigDirs) -> anyhow::Result<()> {
    let config_path = dirs.config_path();
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init(init_args) => init_config(init_args, config_path),
        ConfigCommand::Get { key } => get_config(config_path, &key),
        ConfigCommand::Set { key, value } => set_config(config_path, &key, &value),
        ConfigCommand::Path => show_path(config_path),
    }
}

fn show_config(config_path: PathBuf) -> anyhow::Result<()> {
    if !config_path.exists() {
        eprintln!("{} No config file found, showing defaults.", style("ℹ").blue());
    }
    let config = load_config_from(&config_path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, config_path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    AppConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(config_path: PathBuf, key: &str) -> anyhow::Result<()> {
    let config = load_config_from(&config_path)?;
    let json = serde_json::to_value(&config)?;

    let mut current = &json;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }

    println!("{}", serde_json::to_string_pretty(current)?);

    Ok(())
}

fn set_config(config_path: PathBuf, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_config_from(&config_path)?;

    // Bare words such as `serif` or `#EC4899` are taken as strings
    let parsed_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    assign(&mut json, key, parsed_value.clone())?;

    let config: AppConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(&config_path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

/// Replace the leaf at the dotted `key`. Only existing settings can be set,
/// and whole sections cannot be replaced.
fn assign(json: &mut serde_json::Value, key: &str, value: serde_json::Value) -> anyhow::Result<()> {
    let mut slot = json;
    for (depth, segment) in key.split('.').enumerate() {
        let section = slot.as_object_mut().ok_or_else(|| {
            let parent = key.split('.').take(depth).collect::<Vec<_>>().join(".");
            anyhow::anyhow!("{} is a value and has no field {}", parent, segment)
        })?;
        slot = section
            .get_mut(segment)
            .ok_or_else(|| anyhow::anyhow!("Unknown setting: {}", key))?;
    }

    if slot.is_object() {
        anyhow::bail!("{} is a section; set one of its fields instead", key);
    }
    *slot = value;
    Ok(())
}

fn show_path(config_path: PathBuf) -> anyhow::Result<()> {
    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'ink2text config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn defaults() -> serde_json::Value {
        serde_json::to_value(AppConfig::default()).unwrap()
    }

    #[test]
    fn test_assign_leaf() {
        let mut config = defaults();
        assign(&mut config, "service.model", json!("gemini-2.5-pro")).unwrap();
        assert_eq!(config["service"]["model"], json!("gemini-2.5-pro"));
    }

    #[test]
    fn test_assign_rejects_unknown_and_sections() {
        let mut config = defaults();
        let before = config.clone();

        let err = assign(&mut config, "service.nope", json!(1)).unwrap_err();
        assert_eq!(err.to_string(), "Unknown setting: service.nope");

        let err = assign(&mut config, "service", json!("x")).unwrap_err();
        assert_eq!(err.to_string(), "service is a section; set one of its fields instead");

        let err = assign(&mut config, "service.model.name", json!("x")).unwrap_err();
        assert_eq!(err.to_string(), "service.model is a value and has no field name");

        assert!(assign(&mut config, "", json!("x")).is_err());
        assert_eq!(config, before);
    }
}
