/*!
 * # subanim - Subtitle to Animation Timeline Importer
 *
 * A Rust library that turns text subtitle files into continuous keyframe
 * timelines for driving a text-display animation.
 *
 * ## Features
 *
 * - Extract subtitle tracks from media containers via ffmpeg/ffprobe
 * - Sniff and parse SubRip, WebVTT, SSA/ASS, MicroDVD and SubViewer cues
 * - Strip renderer-incompatible markup (HTML-like tags, override codes)
 * - Synthesize gap-filling keyframe timelines with explicit blank keyframes
 * - Safe in-place cleaning of subtitle files on disk
 * - Per-track failure isolation when importing multi-track containers
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `sanitize`: Markup removal from cue text
 * - `cue`: Subtitle format detection and cue parsing
 * - `timeline`: Keyframe timeline synthesis
 * - `clean`: File-level clean pass with in-place rewriting
 * - `demux`: ffprobe/ffmpeg subprocess orchestration
 * - `host`: Scene host seam consuming finished timelines
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod clean;
pub mod cue;
pub mod demux;
pub mod errors;
pub mod file_utils;
pub mod host;
pub mod language_utils;
pub mod sanitize;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use cue::{Cue, CueList, ParseOptions, SubtitleFormat};
pub use errors::{CleanError, DemuxError, ImportError, ParseError, SynthesisError};
pub use host::{JsonAssetHost, SceneHost};
pub use sanitize::{sanitize_line, Dialect};
pub use timeline::{synthesize, Keyframe, Timeline, Track};
