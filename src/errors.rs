/*!
 * Error types for the subanim application.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Error raised by the cue parser when a subtitle file cannot be parsed
#[derive(Error, Debug)]
#[error("malformed cue block {block_index}: {reason}")]
pub struct ParseError {
    /// Zero-based index of the offending cue block in the source file
    pub block_index: usize,

    /// Human-readable description of what went wrong
    pub reason: String,
}

impl ParseError {
    pub fn new(block_index: usize, reason: impl Into<String>) -> Self {
        ParseError {
            block_index,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while synthesizing a keyframe timeline
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// The cue list was empty, there is no last cue to derive a duration from
    #[error("cannot synthesize a timeline from an empty cue list")]
    EmptyInput,
}

/// Errors that can occur during the file-level clean pass
#[derive(Error, Debug)]
pub enum CleanError {
    /// Read or write failure, carries the path for caller-side logging
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path of the file being read or written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Errors from the external demuxer tools (ffprobe/ffmpeg)
#[derive(Error, Debug)]
pub enum DemuxError {
    /// The tool could not be spawned at all
    #[error("failed to run {tool}: {source}")]
    Spawn {
        /// Tool name
        tool: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The tool ran past its deadline and was abandoned
    #[error("{tool} timed out after {seconds} seconds")]
    Timeout {
        /// Tool name
        tool: &'static str,
        /// Timeout that was exceeded
        seconds: u64,
    },

    /// The tool exited with a non-zero status
    #[error("{tool} failed: {detail}")]
    ToolFailed {
        /// Tool name
        tool: &'static str,
        /// Filtered stderr output
        detail: String,
    },

    /// Extraction produced an empty file, the track had no usable cues
    #[error("extracted file is empty, no subtitles found in track {track_index}")]
    EmptyOutput {
        /// Stream index of the track that produced nothing
        track_index: usize,
    },

    /// ffprobe produced output that could not be decoded as JSON
    #[error("failed to parse ffprobe output: {0}")]
    InvalidProbeOutput(#[from] serde_json::Error),
}

/// Main import error type that wraps all pipeline failures
#[derive(Error, Debug)]
pub enum ImportError {
    /// No known subtitle format matched the file content
    #[error("unrecognized subtitle format in {path}")]
    UnknownFormat {
        /// File whose content could not be identified
        path: PathBuf,
    },

    /// Error from the cue parser
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error from the timeline synthesizer
    #[error("synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Error from the file-level clean pass
    #[error("clean error: {0}")]
    Clean(#[from] CleanError),

    /// Error from the external demuxer
    #[error("demux error: {0}")]
    Demux(#[from] DemuxError),

    /// Error from a plain file operation
    #[error("file error: {0}")]
    File(String),
}

impl From<std::io::Error> for ImportError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
