//! Convert command - extract a rate list from a photographed note.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ink2text_core::render::LOADING_MESSAGE;
use ink2text_core::{App, GeminiClient, ImagePayload};

use super::ConfigDirs;
use super::output::{OutputArgs, emit};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Image of the handwritten note
    #[arg(required = true)]
    image: PathBuf,

    /// API key for this call, overriding the stored one
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model to use instead of the configured one
    #[arg(long)]
    model: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn run(args: ConvertArgs, dirs: &ConfigDirs) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = dirs.load_config()?;
    if let Some(model) = &args.model {
        config.service.model = model.clone();
    }

    if !args.image.exists() {
        anyhow::bail!("Input file not found: {}", args.image.display());
    }

    info!("Processing file: {}", args.image.display());
    let image = ImagePayload::from_path(&args.image)?;

    let client = GeminiClient::new(&config.service)?;
    let mut app = App::new(config, dirs.load_settings());
    app.set_credential_override(args.api_key.clone());
    app.select_image(image);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}")?);
    pb.set_message(LOADING_MESSAGE);
    pb.enable_steady_tick(Duration::from_millis(100));

    let converted = app.convert(&client).await;
    pb.finish_and_clear();

    if !converted {
        let message = app.error().unwrap_or("conversion failed");
        anyhow::bail!("{}", message);
    }

    debug!("Conversion took {:?}", start.elapsed());

    emit(&mut app, &args.output)
}
