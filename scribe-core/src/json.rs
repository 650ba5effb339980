//! JSON transcript encoding.
//!
//! Shape: `{"language": "en" | null, "segments": [{"start", "end", "text"}, ...]}`,
//! pretty-printed with two-space indentation and no trailing newline.

use crate::error::{InputError, OutputError};
use crate::types::Transcript;

/// Render a transcript as pretty-printed JSON.
pub fn to_string(transcript: &Transcript) -> Result<String, OutputError> {
    serde_json::to_string_pretty(transcript).map_err(OutputError::Encode)
}

/// Parse a transcript written by [`to_string`], validating every segment.
pub fn from_str(json: &str) -> Result<Transcript, InputError> {
    serde_json::from_str(json).map_err(InputError::Decode)
}
