//! Cap subcommand - generate transcript and caption files from recognizer output.

use crate::cli::OutputArgs;
use crate::config::OutputConfig;
use eyre::{Context, Result};
use scribe_core::error::InputError;
use scribe_core::format::write_transcript;
use scribe_core::recognition::Recognition;
use scribe_core::segment::Segmenter;
use scribe_core::srt;
use scribe_core::types::Transcript;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// CLI arguments for caption generation.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to recognizer output (JSON with `language` and `segments`)
    pub path: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Max words per subtitle segment, regrouping segments that carry word timestamps
    #[arg(long)]
    pub max_words: Option<usize>,

    /// Print the first and last subtitle blocks
    #[arg(long)]
    pub preview: bool,
}

/// Resolved configuration for caption generation.
#[derive(Debug)]
pub struct Config {
    pub path: PathBuf,
    pub output: OutputConfig,
    pub segmenter: Option<Segmenter>,
    pub preview: bool,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let segmenter = args
            .max_words
            .map(Segmenter::new)
            .transpose()
            .wrap_err("invalid --max-words")?;

        Ok(Self {
            path: args.path,
            output: args.output.try_into()?,
            segmenter,
            preview: args.preview,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    let outputs = config.output.resolve(&config.path)?;

    tracing::info!(
        input = ?config.path.display(),
        outputs = outputs.len(),
        "generating captions"
    );

    let s = Instant::now();

    let transcript = load_transcript(&config.path, config.segmenter)?;

    tracing::info!(
        language = transcript.language().unwrap_or("unknown"),
        segments = transcript.len(),
        duration = %format_secs(s.elapsed().as_secs_f32()),
        "transcript ready"
    );

    for (format, path) in outputs {
        tracing::info!(%format, path = ?path.display(), "write transcript");

        write_transcript(&transcript, &path, format)
            .wrap_err_with(|| format!("failed to write {format}: {:?}", path.display()))?;
    }

    if config.preview {
        print!("{}", srt::preview(transcript.segments(), 3, 3));
    }

    Ok(())
}

/// Load recognizer output and regroup it when a segmenter is configured.
pub fn load_transcript(path: &Path, segmenter: Option<Segmenter>) -> Result<Transcript> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read recognition: {:?}", path.display()))?;

    caption(&json, segmenter)
        .wrap_err_with(|| format!("invalid recognition: {:?}", path.display()))
}

/// Validate a recognizer JSON dump and regroup it when a segmenter is given.
pub fn caption(json: &str, segmenter: Option<Segmenter>) -> Result<Transcript, InputError> {
    let recognition = Recognition::from_json(json)?;

    match segmenter {
        Some(segmenter) => {
            if !recognition.has_words() {
                tracing::warn!("no word timestamps in recognition, keeping recognizer segments");
            }
            segmenter.regroup_recognition(recognition)
        }
        None => Ok(recognition.into_transcript()),
    }
}

/// Format seconds as a string with two decimal places.
fn format_secs(secs: f32) -> String {
    format!("{:.2}s", secs)
}
