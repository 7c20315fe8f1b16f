use std::path::Path;
use serde::{Deserialize, Serialize};
use serde_json::{from_str, Value};
use log::{error, warn};
use tokio::process::Command;

use crate::cue::SubtitleFormat;
use crate::errors::DemuxError;
use crate::language_utils;

// @module: External demuxer client (ffprobe/ffmpeg subprocesses)

// @const: Deadline for ffprobe stream listing
const PROBE_TIMEOUT_SECS: u64 = 60;

// @const: Deadline for ffmpeg track extraction
const EXTRACT_TIMEOUT_SECS: u64 = 120;

/// Metadata of one subtitle stream inside a media container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleTrackInfo {
    /// The index/id of the subtitle track
    pub index: usize,
    /// The codec name of the subtitle track
    pub codec_name: String,
    /// The language code (ISO 639-1 or ISO 639-2)
    pub language: Option<String>,
    /// The title of the subtitle track if available
    pub title: Option<String>,
}

impl SubtitleTrackInfo {
    /// The parseable text format this track extracts to.
    ///
    /// Unknown text codecs fall back to SubRip, which ffmpeg can convert
    /// nearly every text codec into.
    pub fn extraction_format(&self) -> SubtitleFormat {
        SubtitleFormat::from_codec_name(&self.codec_name).unwrap_or(SubtitleFormat::SubRip)
    }

    /// Whether the codec is bitmap-based and cannot be converted to text
    pub fn is_bitmap(&self) -> bool {
        matches!(
            self.codec_name.as_str(),
            "hdmv_pgs_subtitle" | "dvd_subtitle" | "dvb_subtitle" | "xsub"
        )
    }
}

/// List subtitle tracks in a media file via ffprobe
pub async fn list_subtitle_tracks<P: AsRef<Path>>(
    media_path: P,
) -> Result<Vec<SubtitleTrackInfo>, DemuxError> {
    let media_path = media_path.as_ref();

    // Add timeout to prevent hanging on problematic files
    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-select_streams",
            "s",
            media_path.to_str().unwrap_or(""),
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(PROBE_TIMEOUT_SECS);
    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| DemuxError::Spawn { tool: "ffprobe", source: e })?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(DemuxError::Timeout { tool: "ffprobe", seconds: PROBE_TIMEOUT_SECS });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("ffprobe failed: {}", stderr);
        return Err(DemuxError::ToolFailed {
            tool: "ffprobe",
            detail: stderr.trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let json: Value = from_str(&stdout)?;

    let mut tracks = Vec::new();
    if let Some(streams) = json.get("streams").and_then(|s| s.as_array()) {
        for stream in streams.iter() {
            let index = stream
                .get("index")
                .and_then(|v| v.as_u64())
                .map(|v| v as usize)
                .unwrap_or(0);

            let codec_name = stream
                .get("codec_name")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");

            let language = stream
                .get("tags")
                .and_then(|t| t.get("language"))
                .and_then(|l| l.as_str())
                .map(|s| s.to_string());

            let title = stream
                .get("tags")
                .and_then(|t| t.get("title"))
                .and_then(|l| l.as_str())
                .map(|s| s.to_string());

            tracks.push(SubtitleTrackInfo {
                index,
                codec_name: codec_name.to_string(),
                language,
                title,
            });
        }
    }

    Ok(tracks)
}

/// Extract one subtitle track to a text subtitle file via ffmpeg.
///
/// The output format follows the track's codec where the parser supports it,
/// SubRip otherwise. An empty output file counts as a failure so one useless
/// track never produces a bogus timeline downstream.
pub async fn extract_track<P: AsRef<Path>>(
    media_path: P,
    track: &SubtitleTrackInfo,
    output_path: &Path,
) -> Result<(), DemuxError> {
    let media_path = media_path.as_ref();
    let format = track.extraction_format();

    let ffmpeg_future = Command::new("ffmpeg")
        .args([
            "-y", // Overwrite existing file
            "-i",
            media_path.to_str().unwrap_or_default(),
            "-map",
            &format!("0:{}", track.index),
            "-c:s",
            extraction_codec(format),
            output_path.to_str().unwrap_or_default(),
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(EXTRACT_TIMEOUT_SECS);
    let result = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| DemuxError::Spawn { tool: "ffmpeg", source: e })?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(DemuxError::Timeout { tool: "ffmpeg", seconds: EXTRACT_TIMEOUT_SECS });
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("Subtitle extraction failed: {}", filtered);
        return Err(DemuxError::ToolFailed {
            tool: "ffmpeg",
            detail: filtered,
        });
    }

    let file_size = std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0);
    if file_size == 0 {
        return Err(DemuxError::EmptyOutput {
            track_index: track.index,
        });
    }

    Ok(())
}

/// ffmpeg subtitle encoder for a target text format
fn extraction_codec(format: SubtitleFormat) -> &'static str {
    match format {
        SubtitleFormat::SubRip => "srt",
        SubtitleFormat::WebVtt => "webvtt",
        SubtitleFormat::SubStationAlpha => "ass",
        // no text encoder for frame/centisecond formats, convert to SRT
        SubtitleFormat::MicroDvd | SubtitleFormat::SubViewer => "srt",
    }
}

/// Display label for a track, safe to use as part of a file name.
///
/// Prefers the track title, falls back to the language display name, then the
/// raw language code. Characters invalid in file names become spaces.
pub fn track_label(position: usize, track: &SubtitleTrackInfo) -> String {
    let descriptor = match (&track.title, &track.language) {
        (Some(title), _) if !title.is_empty() => title.clone(),
        (_, Some(code)) => language_utils::get_language_name(code).unwrap_or_else(|_| code.clone()),
        _ => "unknown".to_string(),
    };

    let label = format!("{} - {}", position, descriptor);
    label
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                ' '
            } else {
                c
            }
        })
        .collect()
}

/// Partition tracks into text-based ones, warning about skipped bitmap tracks
pub fn text_tracks(tracks: &[SubtitleTrackInfo]) -> Vec<&SubtitleTrackInfo> {
    let text: Vec<&SubtitleTrackInfo> = tracks.iter().filter(|t| !t.is_bitmap()).collect();

    let bitmap_count = tracks.len() - text.len();
    if bitmap_count > 0 {
        warn!(
            "Skipping {} bitmap subtitle track(s) (PGS/VobSub), only text-based tracks can be extracted",
            bitmap_count
        );
    }

    text
}

/// Reduce ffmpeg stderr to its meaningful error lines.
///
/// The version banner, build configuration, and per-stream metadata dumps
/// drown out the one line that says what actually went wrong.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    const NOISE_PREFIXES: &[&str] = &[
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Output #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "Stream mapping:",
        "Side data:",
        "Press [q]",
        "encoder",
        "title",
        "language",
        "handler_name",
        "BPS",
        "DURATION",
        "NUMBER_OF",
        "_STATISTICS",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(|line| line.trim())
        .filter(|line| {
            !line.is_empty() && !NOISE_PREFIXES.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
