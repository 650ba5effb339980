//! Output format selection and persistence.

use crate::error::{ConfigError, OutputError, Result};
use crate::types::Transcript;
use crate::{json, srt};
use std::fmt::{self, Display};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tempfile::Builder;

/// Supported transcript encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Language plus ordered segment list
    Json,
    /// Numbered SubRip caption blocks
    Srt,
}

impl OutputFormat {
    pub const ALL: [Self; 2] = [Self::Json, Self::Srt];

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Srt => "srt",
        }
    }

    /// Serialize a transcript in this format.
    pub fn render(&self, transcript: &Transcript) -> Result<String> {
        match self {
            Self::Json => Ok(json::to_string(transcript)?),
            Self::Srt => Ok(srt::to_string(transcript)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "srt" => Ok(Self::Srt),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Serialize `transcript` and atomically write it to `path`.
///
/// Missing parent directories are created. Content is written to a temporary
/// file next to `path` and renamed into place only after it is fully flushed, so
/// a failure never leaves a truncated file behind.
pub fn write_transcript(
    transcript: &Transcript,
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<()> {
    let path = path.as_ref();
    let content = format.render(transcript)?;

    tracing::debug!(
        path = ?path.display(),
        %format,
        segments = transcript.len(),
        bytes = content.len(),
        "write transcript"
    );

    persist(path, content.as_bytes()).map_err(|source| OutputError::DestinationWrite {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Write to a temporary sibling of `path`, then rename it into place.
///
/// A replaced file keeps its permissions. New files get the mode
/// `std::fs::write` would give them.
fn persist(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // narrowed by the umask on creation
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut file = builder.tempfile_in(dir)?;
    if let Ok(existing) = std::fs::metadata(path) {
        file.as_file().set_permissions(existing.permissions())?;
    }

    file.write_all(content)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    Ok(())
}
