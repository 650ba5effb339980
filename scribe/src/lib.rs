//! scribe: command-line orchestration for scribe-core.
//!
//! Wires recognizer output through segmentation and formatting to files or an
//! HTTP job server, and extracts decodable audio from media files for the
//! recognizer.

pub mod cap;
pub mod cli;
pub mod config;
pub mod extract;
pub mod serve;
