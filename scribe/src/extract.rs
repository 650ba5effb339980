//! Extract subcommand - produce recognizer-ready audio from a media file.
//!
//! Audio files are used as-is. Video files are demuxed with `ffmpeg` into 16kHz
//! mono 16-bit PCM WAV.

use color_eyre::Section;
use duct::cmd;
use eyre::{Context, Result, eyre};
use hound::WavReader;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Video container extensions handled by ffmpeg extraction.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v"];

/// Audio extensions passed through without conversion.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg", "flac", "wma"];

/// Media classification by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Classify a path by its (case-insensitive) extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();

        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Audio)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// CLI arguments for audio extraction.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to input video or audio file
    pub path: PathBuf,

    /// Output WAV path (default: same as input with .wav extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Resolved configuration for audio extraction.
#[derive(Debug)]
pub struct Config {
    pub path: PathBuf,
    pub output: PathBuf,
    pub kind: MediaKind,
}

impl TryFrom<Args> for Config {
    type Error = eyre::Error;

    fn try_from(args: Args) -> Result<Self> {
        let kind = MediaKind::from_path(&args.path)
            .ok_or_else(|| eyre!("unsupported media format: {:?}", args.path.display()))
            .with_suggestion(|| {
                format!(
                    "expected a video ({}) or audio ({}) file",
                    VIDEO_EXTENSIONS.join(", "),
                    AUDIO_EXTENSIONS.join(", ")
                )
            })?;

        let output = args
            .output
            .unwrap_or_else(|| args.path.with_extension("wav"));

        Ok(Self {
            path: args.path,
            output,
            kind,
        })
    }
}

pub fn execute(config: Config) -> Result<()> {
    if !config.path.exists() {
        return Err(eyre!("input file not found: {:?}", config.path.display()));
    }

    let audio_path = match config.kind {
        MediaKind::Audio => {
            tracing::info!(path = ?config.path.display(), "using audio file directly");
            config.path
        }
        MediaKind::Video => {
            tracing::info!(
                input = ?config.path.display(),
                output = ?config.output.display(),
                "extracting audio"
            );
            extract_audio(&config.path, &config.output)?;
            config.output
        }
    };

    if audio_path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("wav")) {
        log_wav_spec(&audio_path)?;
    }

    println!("{}", audio_path.display());

    Ok(())
}

/// Demux the audio stream of `input` into a 16kHz mono PCM WAV at `output`.
pub fn extract_audio(input: &Path, output: &Path) -> Result<()> {
    if let Some(dir) = output.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("failed to create directory: {:?}", dir.display()))?;
    }

    let result = cmd!(
        "ffmpeg", "-i", input, "-vn", // no video
        "-acodec", "pcm_s16le", // 16-bit PCM
        "-ar", "16000", // 16kHz sample rate
        "-ac", "1", // mono
        "-y", output
    )
    .stdout_null()
    .stderr_capture()
    .unchecked()
    .run();

    let out = match result {
        Ok(out) => out,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(eyre!("ffmpeg is not installed or not found in PATH"))
                .suggestion("install ffmpeg to extract audio from video files");
        }
        Err(e) => return Err(e).wrap_err("failed to run ffmpeg"),
    };

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(eyre!("failed to extract audio ({})", out.status))
            .with_note(|| stderr.trim().to_string());
    }

    Ok(())
}

fn log_wav_spec(path: &Path) -> Result<()> {
    let reader = WavReader::open(path)
        .wrap_err_with(|| format!("failed to open audio: {}", path.display()))?;

    let spec = reader.spec();
    let duration = reader.duration() as f32 / spec.sample_rate as f32;

    tracing::debug!(
        path = %path.display(),
        duration = %format!("{duration:.2}s"),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits_per_sample = spec.bits_per_sample,
        format = ?spec.sample_format,
        "wav spec"
    );
    Ok(())
}
