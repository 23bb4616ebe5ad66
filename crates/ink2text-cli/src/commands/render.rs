//! Render command - print or export a saved result without a service call.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use ink2text_core::{App, ExtractionResult};

use super::ConfigDirs;
use super::output::{OutputArgs, emit};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// JSON file written by `convert --save`
    #[arg(required = true)]
    result: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

pub fn run(args: RenderArgs, dirs: &ConfigDirs) -> anyhow::Result<()> {
    let data = fs::read_to_string(&args.result)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.result.display(), e))?;
    let result: ExtractionResult = serde_json::from_str(&data)?;

    let mut app = App::new(dirs.load_config()?, dirs.load_settings());
    app.restore_result(result);

    emit(&mut app, &args.output)
}
