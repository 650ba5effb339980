//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use eyre::Result;
use scribe_core::format::OutputFormat;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scribe")]
#[command(about = "Transcript and subtitle tools for speech recognition output")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate JSON transcript and SRT subtitles from recognizer output
    Cap(crate::cap::Args),

    /// Extract 16kHz mono WAV audio from a media file
    Extract(crate::extract::Args),

    /// Run an HTTP server that captions uploaded recognizer output
    Serve(crate::serve::Args),
}

/// Output selection shared by commands that write transcripts.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output format(s)
    #[arg(short, long = "format", num_args = 1.., value_delimiter = ',', default_values_t = OutputFormat::ALL)]
    pub formats: Vec<OutputFormat>,

    /// Output directory (default: same directory as input)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Base name for output files (default: input file name without extension)
    #[arg(long)]
    pub output_name: Option<String>,
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Cap(args) => crate::cap::execute(args.try_into()?),
        Commands::Extract(args) => crate::extract::execute(args.try_into()?),
        Commands::Serve(args) => crate::serve::execute(args.into()),
    }
}
