//! Core types for scribe-core

use crate::error::Fault;
use serde::{Deserialize, Serialize};

/// Text segment with timestamps.
///
/// Represents a portion of transcribed text with start and end times in seconds.
/// Always satisfies `0 <= start <= end`; construct through [`Segment::new`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SegmentRecord")]
pub struct Segment {
    /// Start time in seconds
    start: f64,
    /// End time in seconds
    end: f64,
    /// Transcribed text, trimmed
    text: String,
}

impl Segment {
    /// Create a segment, trimming `text`.
    pub fn new(start: f64, end: f64, text: impl AsRef<str>) -> Result<Self, Fault> {
        check_timing(start, end)?;

        Ok(Self {
            start,
            end,
            text: text.as_ref().trim().to_string(),
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Wire shape of a segment, validated into [`Segment`] on deserialization.
#[derive(Deserialize)]
struct SegmentRecord {
    start: f64,
    end: f64,
    text: String,
}

impl TryFrom<SegmentRecord> for Segment {
    type Error = Fault;

    fn try_from(record: SegmentRecord) -> Result<Self, Fault> {
        Segment::new(record.start, record.end, record.text)
    }
}

/// Recognized token with its own timing.
///
/// Text is stored verbatim, including the leading space some recognizers emit
/// to mark a word boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    start: f64,
    end: f64,
    text: String,
}

impl Word {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Result<Self, Fault> {
        check_timing(start, end)?;

        Ok(Self {
            start,
            end,
            text: text.into(),
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered transcript segments with optional language metadata.
///
/// Segments are kept in insertion order, which callers supply chronologically.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Detected language code (e.g. "en"), serialized as `null` when unknown
    #[serde(default)]
    language: Option<String>,
    segments: Vec<Segment>,
}

impl Transcript {
    pub fn new(segments: Vec<Segment>, language: Option<String>) -> Self {
        Self { language, segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

/// Validate a `start..end` pair in seconds.
fn check_timing(start: f64, end: f64) -> Result<(), Fault> {
    if !start.is_finite() || !end.is_finite() {
        return Err(Fault::NonFinite);
    }
    if start < 0.0 {
        return Err(Fault::NegativeStart(start));
    }
    if end < start {
        return Err(Fault::EndBeforeStart { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_segment_text() {
        let segment = Segment::new(0.0, 1.0, "  Hello world.\n").unwrap();
        assert_eq!(segment.text(), "Hello world.");
    }

    #[test]
    fn accepts_zero_duration() {
        let segment = Segment::new(2.5, 2.5, "uh").unwrap();
        assert_eq!(segment.duration(), 0.0);
    }

    #[test]
    fn rejects_end_before_start() {
        let err = Segment::new(2.0, 1.0, "backwards").unwrap_err();
        assert_eq!(err, Fault::EndBeforeStart { start: 2.0, end: 1.0 });
    }

    #[test]
    fn rejects_negative_and_non_finite_times() {
        assert_eq!(
            Segment::new(-0.5, 1.0, "early").unwrap_err(),
            Fault::NegativeStart(-0.5)
        );
        assert_eq!(
            Word::new(0.0, f64::NAN, "never").unwrap_err(),
            Fault::NonFinite
        );
    }

    #[test]
    fn keeps_word_text_verbatim() {
        let word = Word::new(0.0, 0.4, " Hello").unwrap();
        assert_eq!(word.text(), " Hello");
    }

    #[test]
    fn deserialization_validates_segments() {
        let json = r#"{"language": null, "segments": [{"start": 3.0, "end": 1.0, "text": "x"}]}"#;
        let result: Result<Transcript, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn missing_language_deserializes_as_unset() {
        let transcript: Transcript = serde_json::from_str(r#"{"segments": []}"#).unwrap();
        assert_eq!(transcript.language(), None);
        assert!(transcript.is_empty());
    }
}
