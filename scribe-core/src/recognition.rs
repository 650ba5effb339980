//! Recognizer output schema and its validation.
//!
//! Recognizers hand back loosely shaped records. [`RawRecognition`] mirrors that
//! shape with every field optional and untyped; [`Recognition`] is the validated
//! form the rest of the crate works with. A record field that is missing or has
//! the wrong type is reported with the record's position.

use crate::error::{Fault, InputError};
use crate::types::{Segment, Transcript, Word};
use serde::Deserialize;
use serde_json::Value;

/// Recognizer output as it arrives, before validation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawRecognition {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub segments: Vec<RawSegment>,
}

/// Segment record as emitted by a recognizer.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawSegment {
    pub start: Option<Value>,
    pub end: Option<Value>,
    pub text: Option<Value>,
    #[serde(default)]
    pub words: Option<Vec<RawWord>>,
}

/// Word timing record as emitted by a recognizer.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawWord {
    pub start: Option<Value>,
    pub end: Option<Value>,
    #[serde(alias = "word")]
    pub text: Option<Value>,
}

/// Recognized segment with optional word timings.
#[derive(Clone, Debug, PartialEq)]
pub struct RecognizedSegment {
    pub segment: Segment,
    /// Word timings, `None` when the recognizer ran without word timestamps
    pub words: Option<Vec<Word>>,
}

/// Validated recognizer output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recognition {
    pub language: Option<String>,
    pub segments: Vec<RecognizedSegment>,
}

impl Recognition {
    /// Decode and validate a recognizer JSON dump.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        let raw: RawRecognition = serde_json::from_str(json).map_err(InputError::Decode)?;
        raw.try_into()
    }

    /// Drop word timings and keep the recognizer's own segmentation.
    pub fn into_transcript(self) -> Transcript {
        let segments = self.segments.into_iter().map(|s| s.segment).collect();
        Transcript::new(segments, self.language)
    }

    /// Whether any segment carries word timings.
    pub fn has_words(&self) -> bool {
        self.segments.iter().any(|s| s.words.is_some())
    }
}

impl TryFrom<RawRecognition> for Recognition {
    type Error = InputError;

    fn try_from(raw: RawRecognition) -> Result<Self, InputError> {
        let segments = raw
            .segments
            .into_iter()
            .enumerate()
            .map(|(index, segment)| validate_segment(index, segment))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            language: raw.language,
            segments,
        })
    }
}

fn validate_segment(index: usize, raw: RawSegment) -> Result<RecognizedSegment, InputError> {
    let malformed = |fault| InputError::MalformedSegment { index, fault };

    let start = seconds(raw.start, "start", Fault::MissingStart).map_err(malformed)?;
    let end = seconds(raw.end, "end", Fault::MissingEnd).map_err(malformed)?;
    let text = text_field(raw.text).map_err(malformed)?;

    let segment = Segment::new(start, end, text).map_err(malformed)?;

    let words = match raw.words {
        Some(words) => validate_words(index, words)?,
        None => None,
    };

    Ok(RecognizedSegment { segment, words })
}

/// Validate word records, dropping blank tokens.
///
/// An empty list means the recognizer ran without word timestamps and yields
/// `None`. A list whose tokens are all blank yields `Some` of an empty list, so
/// regrouping drops the segment.
fn validate_words(segment: usize, raw: Vec<RawWord>) -> Result<Option<Vec<Word>>, InputError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let mut words = Vec::with_capacity(raw.len());
    let mut previous: Option<f64> = None;

    for (index, word) in raw.into_iter().enumerate() {
        let malformed = |fault| InputError::MalformedWord {
            segment,
            index,
            fault,
        };

        let start = seconds(word.start, "start", Fault::MissingStart).map_err(malformed)?;
        let end = seconds(word.end, "end", Fault::MissingEnd).map_err(malformed)?;
        let text = text_field(word.text).map_err(malformed)?;

        let word = Word::new(start, end, text).map_err(malformed)?;

        if let Some(previous) = previous
            && word.start() < previous
        {
            return Err(malformed(Fault::OutOfOrder {
                previous,
                start: word.start(),
            }));
        }
        previous = Some(word.start());

        if word.text().trim().is_empty() {
            tracing::debug!(segment, index, "dropping blank word");
            continue;
        }

        words.push(word);
    }

    Ok(Some(words))
}

/// Read a timestamp field; `null` counts as missing.
fn seconds(value: Option<Value>, field: &'static str, missing: Fault) -> Result<f64, Fault> {
    match value {
        None | Some(Value::Null) => Err(missing),
        Some(Value::Number(n)) => n.as_f64().ok_or(Fault::NotNumeric { field }),
        Some(_) => Err(Fault::NotNumeric { field }),
    }
}

fn text_field(value: Option<Value>) -> Result<String, Fault> {
    match value {
        None | Some(Value::Null) => Err(Fault::MissingText),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(Fault::NotText),
    }
}
