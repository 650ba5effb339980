//! SRT subtitle conversion utilities.
//!
//! Converts segments with timestamps into SRT subtitle format and back.
//!
//! Layout: every block is an index line, a timing line, and the text lines,
//! each terminated by `\n`. Blocks are separated by a single blank line, so the
//! output ends with exactly one `\n`. An empty caption still gets its (empty)
//! text line. An empty transcript renders as `""`. Blank lines inside a caption
//! would end its block early, so they are left out.

use crate::error::InputError;
use crate::types::{Segment, Transcript};
use std::fmt::{self, Display};

/// Subtitle timestamp with millisecond precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    /// Total milliseconds
    millis: u64,
}

impl Timestamp {
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Convert seconds to a timestamp, rounding half up to the nearest millisecond.
    ///
    /// Rounding works on the shortest decimal form of `secs`, the digits it was
    /// written with, so `1.9995` (stored as `1.99949999...`) becomes `2.000`
    /// while `2.0004999` stays `2.000`. Negative and non-finite input gives zero.
    pub fn from_secs(secs: f64) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::default();
        }

        let repr = secs.to_string();
        let (whole, frac) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
        let frac = format!("{frac:0<4}");

        let whole: u64 = whole.parse().unwrap_or(u64::MAX);
        let millis: u64 = frac[..3].parse().unwrap_or(0);
        let half_up = u64::from(frac.as_bytes()[3] >= b'5');

        Self::from_millis(whole.saturating_mul(1000).saturating_add(millis + half_up))
    }

    pub fn millis(&self) -> u64 {
        self.millis
    }

    pub fn as_secs(&self) -> f64 {
        self.millis as f64 / 1000.0
    }

    /// Parse `HH:MM:SS,mmm`.
    fn parse(s: &str) -> Option<Self> {
        let (hms, millis) = s.trim().split_once(',')?;
        let mut parts = hms.split(':');

        let hours: u64 = parts.next()?.parse().ok()?;
        let minutes: u64 = parts.next()?.parse().ok()?;
        let seconds: u64 = parts.next()?.parse().ok()?;

        if parts.next().is_some() || minutes >= 60 || seconds >= 60 || millis.len() != 3 {
            return None;
        }
        let millis: u64 = millis.parse().ok()?;

        Some(Self::from_millis(
            ((hours * 60 + minutes) * 60 + seconds) * 1000 + millis,
        ))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.millis / 3_600_000;
        let minutes = self.millis / 60_000 % 60;
        let seconds = self.millis / 1000 % 60;
        let millis = self.millis % 1000;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
    }
}

/// Render a transcript as SRT file content.
pub fn to_string(transcript: &Transcript) -> String {
    display_segments(transcript.segments())
}

/// Format segments as SRT blocks numbered from 1.
pub fn display_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .zip(1..)
        .map(|(s, i)| display_block(s, i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one SRT block, terminated by a newline.
fn display_block(segment: &Segment, index: usize) -> String {
    let mut block = format!(
        "{index}\n{} --> {}\n",
        Timestamp::from_secs(segment.start()),
        Timestamp::from_secs(segment.end()),
    );

    let mut lines = segment
        .text()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .peekable();

    if lines.peek().is_none() {
        block.push('\n');
    }
    for line in lines {
        block.push_str(line);
        block.push('\n');
    }

    block
}

/// Display preview of subtitles (first and last blocks).
pub fn preview(segments: &[Segment], head_count: usize, tail_count: usize) -> String {
    let total = segments.len();

    if total <= head_count + tail_count {
        display_segments(segments)
    } else {
        let mut out = Vec::new();
        out.extend(
            segments[0..head_count]
                .iter()
                .zip(1..)
                .map(|(s, i)| display_block(s, i)),
        );
        out.push("...\n".to_string());
        out.extend(
            segments[(total - tail_count)..total]
                .iter()
                .zip((total - tail_count + 1)..)
                .map(|(s, i)| display_block(s, i)),
        );
        out.join("\n")
    }
}

/// Parse SRT content into segments.
///
/// Accepts `\r\n` line endings, runs of blank lines between blocks and a missing
/// final newline. Block indices are checked for being numeric but not for being
/// sequential. Text lines are kept up to the next blank line.
pub fn parse(input: &str) -> Result<Vec<Segment>, InputError> {
    let mut segments = Vec::new();
    let mut lines = input.lines().enumerate().peekable();

    loop {
        // skip separators
        while lines.next_if(|(_, line)| line.trim().is_empty()).is_some() {}

        let Some((index_no, index_line)) = lines.next() else {
            break;
        };
        let malformed = |line: usize, reason: &str| InputError::MalformedSubtitle {
            line: line + 1,
            reason: reason.to_string(),
        };

        index_line
            .trim()
            .trim_start_matches('\u{feff}')
            .parse::<usize>()
            .map_err(|_| malformed(index_no, "expected block index"))?;

        let (timing_no, timing_line) = lines
            .next()
            .ok_or_else(|| malformed(index_no + 1, "missing timing line"))?;

        let (start, end) = timing_line
            .split_once("-->")
            .and_then(|(start, end)| Some((Timestamp::parse(start)?, Timestamp::parse(end)?)))
            .ok_or_else(|| malformed(timing_no, "expected `HH:MM:SS,mmm --> HH:MM:SS,mmm`"))?;

        let mut text = Vec::new();
        while let Some((_, line)) = lines.next_if(|(_, line)| !line.trim().is_empty()) {
            text.push(line);
        }

        let segment = Segment::new(start.as_secs(), end.as_secs(), text.join("\n"))
            .map_err(|fault| malformed(timing_no, &fault.to_string()))?;
        segments.push(segment);
    }

    Ok(segments)
}
