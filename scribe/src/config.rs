//! Configuration types for resolved CLI arguments.
//!
//! This module contains Config structs and their TryFrom implementations.
//! Args structs (for CLI parsing) remain in cli.rs.

use crate::cli::OutputArgs;
use color_eyre::Section;
use eyre::{OptionExt, Result, eyre};
use scribe_core::format::OutputFormat;
use std::path::{Path, PathBuf};

/// Resolved output configuration.
///
/// Converted from OutputArgs via TryFrom. Formats are deduplicated in the order
/// they were requested.
#[derive(Debug)]
pub struct OutputConfig {
    pub formats: Vec<OutputFormat>,
    pub dir: Option<PathBuf>,
    pub name: Option<String>,
}

impl TryFrom<OutputArgs> for OutputConfig {
    type Error = eyre::Error;

    fn try_from(args: OutputArgs) -> Result<Self> {
        let mut formats = Vec::with_capacity(args.formats.len());
        for format in args.formats {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }

        if let Some(name) = &args.output_name
            && (name.is_empty() || name.contains(['/', '\\']))
        {
            return Err(eyre!("invalid output name: {name:?}"))
                .suggestion("use --output-dir to choose a directory and --output-name for the file stem");
        }

        Ok(Self {
            formats,
            dir: args.output_dir,
            name: args.output_name,
        })
    }
}

impl OutputConfig {
    /// Destination path for each selected format.
    ///
    /// `<dir>/<name>.<ext>`, where `dir` defaults to the input's directory and
    /// `name` to the input's file stem. A destination equal to `input` is rejected.
    pub fn resolve(&self, input: &Path) -> Result<Vec<(OutputFormat, PathBuf)>> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        let name = match &self.name {
            Some(name) => name.clone(),
            None => input
                .file_stem()
                .ok_or_eyre("input path has no file name")?
                .to_string_lossy()
                .into_owned(),
        };

        self.formats
            .iter()
            .map(|&format| {
                let path = dir.join(format!("{name}.{}", format.extension()));
                if path == input {
                    return Err(eyre!(
                        "output would overwrite input: {:?}",
                        path.display()
                    ))
                    .suggestion("pass --output-name or --output-dir");
                }
                Ok((format, path))
            })
            .collect()
    }
}
