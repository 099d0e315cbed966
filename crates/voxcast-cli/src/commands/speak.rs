use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use indicatif::ProgressBar;
use voxcast_core::{
    GoogleTranslateSynthesizer, OutputFormat, SpeechRequest, SpeechService, DEFAULT_PRESET,
};

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::style::{spinner_style, Theme};

#[derive(Debug, Args)]
pub struct SpeakArgs {
    /// Text to speak, or "-" to read from stdin
    pub text: String,

    /// Voice preset name (unknown names fall back to the default voice)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Output format: mp3 or wav
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file path (defaults to the suggested filename)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn execute(args: SpeakArgs, config: &Config, theme: &Theme) -> Result<()> {
    // Read text from stdin if "-"
    let text = if args.text == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        args.text
    };

    if text.trim().is_empty() {
        return Err(CliError::InvalidInput("Text cannot be empty".to_string()));
    }

    let preset = args
        .preset
        .or_else(|| config.defaults.preset.clone())
        .unwrap_or_else(|| DEFAULT_PRESET.to_string());
    let format = OutputFormat::parse(
        &args
            .format
            .or_else(|| config.defaults.format.clone())
            .unwrap_or_default(),
    );

    theme.step(1, 2, &format!("Synthesizing with '{preset}'..."));

    let start = std::time::Instant::now();
    let spinner = ProgressBar::new_spinner();
    if !theme.no_color {
        spinner.set_style(spinner_style());
        spinner.set_message("Waiting for synthesis...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    }

    let synthesizer = GoogleTranslateSynthesizer::new()?;
    let service = SpeechService::new(Box::new(synthesizer));
    let result = service
        .speak(SpeechRequest::new(text, preset, format))
        .await;
    spinner.finish_and_clear();
    let output = result?;

    let path = args.output.unwrap_or_else(|| match &config.defaults.output_dir {
        Some(dir) => dir.join(&output.filename),
        None => PathBuf::from(&output.filename),
    });
    tokio::fs::write(&path, &output.bytes).await?;

    theme.success(&format!(
        "Audio saved to: {} ({} bytes, {})",
        path.display(),
        output.bytes.len(),
        output.mime
    ));
    theme.step(2, 2, &format!("Done in {:.2}s", start.elapsed().as_secs_f64()));

    Ok(())
}
