//! scribe-core: transcript segmentation and subtitle formatting.
//!
//! This crate turns validated speech recognition output into subtitle and
//! transcript artifacts. It never talks to a recognizer itself; it consumes the
//! segments and word timings a recognizer produced.
//!
//! # Architecture
//!
//! - [`recognition`]: raw recognizer schema, validated once into [`recognition::Recognition`]
//! - [`types`]: the transcript data model ([`types::Segment`], [`types::Transcript`], [`types::Word`])
//! - [`segment`]: regroups word timings into segments bounded by a word count
//! - [`format`]: closed set of output encodings ([`json`], [`srt`]) and atomic persistence
//!
//! # Quick Start
//!
//! ```no_run
//! use scribe_core::format::{OutputFormat, write_transcript};
//! use scribe_core::recognition::Recognition;
//! use scribe_core::segment::Segmenter;
//!
//! # fn main() -> scribe_core::error::Result<()> {
//! let recognition = Recognition::from_json(r#"{"language": "en", "segments": []}"#)?;
//! let transcript = Segmenter::new(8)?.regroup_recognition(recognition)?;
//!
//! write_transcript(&transcript, "out/talk.srt", OutputFormat::Srt)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod format;
pub mod json;
pub mod recognition;
pub mod segment;
pub mod srt;
pub mod types;
