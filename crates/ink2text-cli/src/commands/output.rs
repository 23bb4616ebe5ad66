//! Output flags shared by `convert` and `render`.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use ink2text_core::render::EMPTY_MESSAGE;
use ink2text_core::{App, FontFamily, FormattingPreferences, Rgb, render_html};

use crate::terminal;

/// How the result is printed and where it is exported.
#[derive(Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "styled")]
    format: OutputFormat,

    /// Write the PDF document to this path
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Save the raw extraction result as JSON to this path
    #[arg(long)]
    save: Option<PathBuf>,

    /// Font family (sans, serif, mono)
    #[arg(long)]
    font: Option<FontFamily>,

    /// Render text in bold
    #[arg(long)]
    bold: bool,

    /// Render text in italic
    #[arg(long)]
    italic: bool,

    /// Text color as #RRGGBB
    #[arg(long)]
    color: Option<Rgb>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Styled terminal output
    Styled,
    /// Plain text, as copied to the clipboard
    Text,
    /// Raw extraction result
    Json,
    /// HTML fragment
    Html,
}

impl OutputArgs {
    /// Preferences from config, with flags layered on top.
    pub fn preferences(&self, base: FormattingPreferences) -> FormattingPreferences {
        FormattingPreferences {
            text_color: self.color.unwrap_or(base.text_color),
            font_family: self.font.unwrap_or(base.font_family),
            bold: base.bold || self.bold,
            italic: base.italic || self.italic,
        }
    }
}

/// Print the current result and write the requested files.
pub fn emit(app: &mut App, args: &OutputArgs) -> anyhow::Result<()> {
    let preferences = args.preferences(*app.preferences());
    app.set_preferences(preferences);

    let output = match args.format {
        OutputFormat::Styled => terminal::render(app.result(), app.preferences()),
        OutputFormat::Text => app.copy_text().unwrap_or_default(),
        OutputFormat::Json => serde_json::to_string_pretty(app.result())?,
        OutputFormat::Html => render_html(&app.view(), app.preferences()),
    };

    if output.is_empty() {
        eprintln!("{} {}", style("ℹ").blue(), EMPTY_MESSAGE);
    } else {
        println!("{}", output);
    }

    if let Some(path) = &args.save {
        fs::write(path, serde_json::to_string_pretty(app.result())?)?;
        info!("Saved result to {}", path.display());
        eprintln!("{} Result saved to {}", style("✓").green(), path.display());
    }

    if let Some(path) = &args.pdf {
        match app.export_pdf() {
            Some(bytes) => {
                fs::write(path, bytes)?;
                eprintln!("{} PDF written to {}", style("✓").green(), path.display());
            }
            None => {
                if let Some(message) = app.error() {
                    anyhow::bail!("{}", message);
                }
                eprintln!("{} Nothing to export, no PDF written.", style("ℹ").blue());
            }
        }
    }

    Ok(())
}
