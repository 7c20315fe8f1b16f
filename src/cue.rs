use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;
use log::warn;

use crate::errors::ParseError;

// @module: Subtitle format detection and cue parsing

// @const: SRT timing line, accepts comma or dot millisecond separators
static SRT_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2})[,.](\d{3})")
        .unwrap()
});

// @const: WebVTT timing line, hours optional, cue settings may follow
static VTT_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:(\d{1,2}):)?(\d{2}):(\d{2})\.(\d{3})\s*-->\s*(?:(\d{1,2}):)?(\d{2}):(\d{2})\.(\d{3})",
    )
    .unwrap()
});

// @const: MicroDVD cue line, {start-frame}{end-frame}text
static MICRODVD_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{(\d+)\}\{(\d+)\}(.*)$").unwrap()
});

// @const: SubViewer timing line, HH:MM:SS.cc,HH:MM:SS.cc
static SUBVIEWER_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})\.(\d{2}),(\d{2}):(\d{2}):(\d{2})\.(\d{2})\s*$").unwrap()
});

// @const: SSA/ASS forced newlines, hard \N and soft \n
static SSA_NEWLINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\[Nn]").unwrap()
});

/// Default frame-rate assumption for frame-addressed formats
pub const DEFAULT_MICRODVD_FPS: f64 = 23.976;

// @struct: Single timed cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Display start in ms
    pub start_ms: u64,

    // @field: Display end in ms
    pub end_ms: u64,

    // @field: Text lines in display order
    pub lines: Vec<String>,
}

impl Cue {
    /// Creates a new cue - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(start_ms: u64, end_ms: u64, lines: Vec<String>) -> Self {
        Cue {
            start_ms,
            end_ms,
            lines,
        }
    }
}

/// Ordered cue sequence in source-file order
pub type CueList = Vec<Cue>;

/// Closed enumeration of the subtitle formats the parser understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// Numbered blocks with arrow-separated HH:MM:SS,mmm timestamps
    SubRip,
    /// Cue blocks behind a WEBVTT header
    WebVtt,
    /// SSA/ASS script with a Dialogue event section
    SubStationAlpha,
    /// Frame-addressed {start}{end} bracket lines
    MicroDvd,
    /// Timestamp-pair blocks with [br] line markers
    SubViewer,
}

impl SubtitleFormat {
    /// Map a demuxer codec name onto a parseable format
    pub fn from_codec_name(codec_name: &str) -> Option<Self> {
        match codec_name.to_lowercase().as_str() {
            "srt" | "subrip" => Some(Self::SubRip),
            "webvtt" | "vtt" => Some(Self::WebVtt),
            "ass" | "ssa" => Some(Self::SubStationAlpha),
            "microdvd" => Some(Self::MicroDvd),
            "subviewer" | "subviewer1" => Some(Self::SubViewer),
            _ => None,
        }
    }

    /// File extension used when extracting a track of this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::SubRip => "srt",
            Self::WebVtt => "vtt",
            Self::SubStationAlpha => "ass",
            Self::MicroDvd | Self::SubViewer => "sub",
        }
    }

    /// Identify the cue format from file content.
    ///
    /// Pure signature sniffing, no extension involved: WEBVTT header cue,
    /// script section tags, frame brackets, SubViewer timestamp pairs, and
    /// finally numbered arrow-timestamp blocks.
    pub fn sniff(content: &str) -> Option<Self> {
        let body = content.trim_start_matches('\u{feff}');
        let first_line = body.lines().find(|l| !l.trim().is_empty()).unwrap_or("");

        if first_line.trim_start().starts_with("WEBVTT") {
            return Some(Self::WebVtt);
        }
        if body.contains("[Script Info]")
            || body.lines().any(|l| l.trim_start().starts_with("Dialogue:"))
        {
            return Some(Self::SubStationAlpha);
        }
        if MICRODVD_LINE_REGEX.is_match(first_line.trim()) {
            return Some(Self::MicroDvd);
        }
        if body.contains("[INFORMATION]")
            || body.lines().any(|l| SUBVIEWER_TIMING_REGEX.is_match(l.trim()))
        {
            return Some(Self::SubViewer);
        }
        if SRT_TIMING_REGEX.is_match(body) {
            return Some(Self::SubRip);
        }

        None
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::SubRip => "SubRip",
            Self::WebVtt => "WebVTT",
            Self::SubStationAlpha => "SubStation Alpha",
            Self::MicroDvd => "MicroDVD",
            Self::SubViewer => "SubViewer",
        };
        write!(f, "{}", name)
    }
}

/// Knobs the parser cannot derive from file content alone
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Frame rate assumed for frame-addressed cues when the file does not
    /// declare one
    pub microdvd_fps: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            microdvd_fps: DEFAULT_MICRODVD_FPS,
        }
    }
}

/// Parse file content of a known format into an ordered cue list.
///
/// Output ordering follows file order. Corrupt timestamps and truncated
/// blocks surface as [`ParseError`] with the offending block index; cues are
/// never silently dropped (blocks with timing but no text are skipped with a
/// warning, which well-formed files do not contain).
pub fn parse(content: &str, format: SubtitleFormat, options: &ParseOptions) -> Result<CueList, ParseError> {
    let content = content.trim_start_matches('\u{feff}');
    match format {
        SubtitleFormat::SubRip => parse_subrip(content),
        SubtitleFormat::WebVtt => parse_webvtt(content),
        SubtitleFormat::SubStationAlpha => parse_substation(content),
        SubtitleFormat::MicroDvd => parse_microdvd(content, options.microdvd_fps),
        SubtitleFormat::SubViewer => parse_subviewer(content),
    }
}

/// Split content into blank-line-delimited blocks of trimmed-end lines
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn components_to_ms(hours: u64, minutes: u64, seconds: u64, millis: u64) -> u64 {
    (hours * 3600 + minutes * 60 + seconds) * 1000 + millis
}

/// Parse one captured arrow-timing line into (start_ms, end_ms)
fn captured_timing_to_ms(caps: &regex::Captures, start_idx: usize) -> (u64, u64) {
    let field = |i: usize| -> u64 {
        caps.get(i).map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };
    let start = components_to_ms(field(start_idx), field(start_idx + 1), field(start_idx + 2), field(start_idx + 3));
    let end = components_to_ms(field(start_idx + 4), field(start_idx + 5), field(start_idx + 6), field(start_idx + 7));
    (start, end)
}

fn validate_cue(block_index: usize, start_ms: u64, end_ms: u64) -> Result<(), ParseError> {
    if end_ms < start_ms {
        return Err(ParseError::new(
            block_index,
            format!("cue ends at {}ms before it starts at {}ms", end_ms, start_ms),
        ));
    }
    Ok(())
}

fn parse_subrip(content: &str) -> Result<CueList, ParseError> {
    let mut cues = Vec::new();

    for (block_index, block) in split_blocks(content).iter().enumerate() {
        let mut line_idx = 0;

        // optional sequence number line, value is irrelevant downstream
        if block[line_idx].trim().parse::<u64>().is_ok() {
            line_idx += 1;
            if line_idx >= block.len() {
                return Err(ParseError::new(block_index, "block ends after sequence number"));
            }
        }

        let timing_line = block[line_idx].trim();
        let caps = SRT_TIMING_REGEX.captures(timing_line).ok_or_else(|| {
            ParseError::new(
                block_index,
                format!("invalid or missing timestamp line: '{}'", timing_line),
            )
        })?;
        let (start_ms, end_ms) = captured_timing_to_ms(&caps, 1);
        validate_cue(block_index, start_ms, end_ms)?;

        let lines: Vec<String> = block[line_idx + 1..]
            .iter()
            .map(|l| l.trim_end().to_string())
            .collect();
        if lines.is_empty() {
            warn!("Skipping cue block {} with no text", block_index);
            continue;
        }

        cues.push(Cue {
            start_ms,
            end_ms,
            lines,
        });
    }

    if cues.is_empty() {
        return Err(ParseError::new(0, "no cue blocks found"));
    }
    Ok(cues)
}

fn parse_webvtt(content: &str) -> Result<CueList, ParseError> {
    let blocks = split_blocks(content);
    let mut blocks = blocks.into_iter();

    match blocks.next() {
        Some(header) if header[0].trim_start().starts_with("WEBVTT") => {}
        _ => return Err(ParseError::new(0, "missing WEBVTT header")),
    }

    let mut cues = Vec::new();
    let mut block_index = 0;

    for block in blocks {
        let first = block[0].trim_start();
        // metadata blocks carry no cues
        if first.starts_with("NOTE") || first.starts_with("STYLE") || first.starts_with("REGION") {
            continue;
        }

        let mut line_idx = 0;
        // optional cue identifier line
        if !block[line_idx].contains("-->") {
            line_idx += 1;
            if line_idx >= block.len() {
                return Err(ParseError::new(block_index, "cue identifier without timing line"));
            }
        }

        let timing_line = block[line_idx].trim();
        let caps = VTT_TIMING_REGEX.captures(timing_line).ok_or_else(|| {
            ParseError::new(
                block_index,
                format!("invalid timing line: '{}'", timing_line),
            )
        })?;
        // cue settings after the second timestamp are discarded
        let (start_ms, end_ms) = captured_timing_to_ms(&caps, 1);
        validate_cue(block_index, start_ms, end_ms)?;

        let lines: Vec<String> = block[line_idx + 1..]
            .iter()
            .map(|l| l.trim_end().to_string())
            .collect();
        if lines.is_empty() {
            warn!("Skipping cue block {} with no text", block_index);
            block_index += 1;
            continue;
        }

        cues.push(Cue {
            start_ms,
            end_ms,
            lines,
        });
        block_index += 1;
    }

    if cues.is_empty() {
        return Err(ParseError::new(0, "no cue blocks found"));
    }
    Ok(cues)
}

/// Parse an SSA/ASS timestamp of the form H:MM:SS.cc to milliseconds
fn parse_ssa_timestamp(value: &str, block_index: usize) -> Result<u64, ParseError> {
    let parts: Vec<&str> = value.trim().split(&[':', '.'][..]).collect();
    if parts.len() != 4 {
        return Err(ParseError::new(
            block_index,
            format!("invalid SSA timestamp: '{}'", value.trim()),
        ));
    }

    let component = |i: usize| -> Result<u64, ParseError> {
        parts[i].parse::<u64>().map_err(|_| {
            ParseError::new(
                block_index,
                format!("invalid SSA timestamp component: '{}'", parts[i]),
            )
        })
    };
    // centiseconds, not milliseconds
    Ok(components_to_ms(component(0)?, component(1)?, component(2)?, component(3)? * 10))
}

fn parse_substation(content: &str) -> Result<CueList, ParseError> {
    // ASS default event layout, used when the [Events] section has no Format line
    const DEFAULT_FIELDS: [&str; 10] = [
        "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text",
    ];

    let mut fields: Vec<String> = DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect();
    let mut in_events = false;
    let mut cues = Vec::new();
    let mut block_index = 0;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            in_events = trimmed.eq_ignore_ascii_case("[events]");
            continue;
        }
        if !in_events && !trimmed.starts_with("Dialogue:") {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("Format:") {
            fields = rest.split(',').map(|f| f.trim().to_lowercase()).collect();
            continue;
        }

        let Some(rest) = trimmed.strip_prefix("Dialogue:") else {
            continue;
        };

        let values: Vec<&str> = rest.splitn(fields.len(), ',').collect();
        let field_value = |name: &str| -> Result<&str, ParseError> {
            let pos = fields.iter().position(|f| f == name).ok_or_else(|| {
                ParseError::new(block_index, format!("event format has no '{}' field", name))
            })?;
            values.get(pos).copied().ok_or_else(|| {
                ParseError::new(block_index, "truncated Dialogue line")
            })
        };

        let start_ms = parse_ssa_timestamp(field_value("start")?, block_index)?;
        let end_ms = parse_ssa_timestamp(field_value("end")?, block_index)?;
        validate_cue(block_index, start_ms, end_ms)?;

        // \N (and soft \n) are forced newlines, expand into real line breaks
        let text = field_value("text")?;
        let lines: Vec<String> = SSA_NEWLINE_REGEX
            .split(text)
            .map(|l| l.to_string())
            .collect();
        if lines.iter().all(|l| l.trim().is_empty()) {
            warn!("Skipping dialogue event {} with no text", block_index);
            block_index += 1;
            continue;
        }

        cues.push(Cue {
            start_ms,
            end_ms,
            lines,
        });
        block_index += 1;
    }

    if cues.is_empty() {
        return Err(ParseError::new(0, "no Dialogue events found"));
    }
    Ok(cues)
}

fn frames_to_ms(frames: u64, fps: f64) -> u64 {
    (frames as f64 * 1000.0 / fps).round() as u64
}

fn parse_microdvd(content: &str, default_fps: f64) -> Result<CueList, ParseError> {
    let mut fps = default_fps;
    let mut cues = Vec::new();

    for (block_index, line) in content.lines().filter(|l| !l.trim().is_empty()).enumerate() {
        let caps = MICRODVD_LINE_REGEX.captures(line.trim()).ok_or_else(|| {
            ParseError::new(block_index, format!("invalid MicroDVD line: '{}'", line.trim()))
        })?;

        let start_frame: u64 = caps[1].parse().map_err(|_| {
            ParseError::new(block_index, "start frame out of range")
        })?;
        let end_frame: u64 = caps[2].parse().map_err(|_| {
            ParseError::new(block_index, "end frame out of range")
        })?;
        let text = &caps[3];

        // a leading cue whose whole text is a number declares the frame rate
        if block_index == 0 && cues.is_empty() {
            if let Ok(declared) = text.trim().parse::<f64>() {
                if declared > 0.0 {
                    fps = declared;
                    continue;
                }
            }
        }

        if end_frame < start_frame {
            return Err(ParseError::new(
                block_index,
                format!("cue ends at frame {} before it starts at frame {}", end_frame, start_frame),
            ));
        }

        let lines: Vec<String> = text.split('|').map(|l| l.to_string()).collect();
        if lines.iter().all(|l| l.trim().is_empty()) {
            warn!("Skipping frame cue {} with no text", block_index);
            continue;
        }

        cues.push(Cue {
            start_ms: frames_to_ms(start_frame, fps),
            end_ms: frames_to_ms(end_frame, fps),
            lines,
        });
    }

    if cues.is_empty() {
        return Err(ParseError::new(0, "no cue lines found"));
    }
    Ok(cues)
}

/// Centisecond-precision SubViewer timestamp fields to milliseconds
fn subviewer_fields_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
    let field = |i: usize| -> u64 {
        caps.get(i).map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };
    components_to_ms(field(start_idx), field(start_idx + 1), field(start_idx + 2), field(start_idx + 3) * 10)
}

fn parse_subviewer(content: &str) -> Result<CueList, ParseError> {
    let mut cues = Vec::new();
    let mut block_index = 0;
    let mut lines_iter = content.lines().peekable();

    while let Some(line) = lines_iter.next() {
        // everything before the first timing line is [INFORMATION] header and
        // style metadata
        let Some(caps) = SUBVIEWER_TIMING_REGEX.captures(line.trim()) else {
            continue;
        };

        let start_ms = subviewer_fields_to_ms(&caps, 1);
        let end_ms = subviewer_fields_to_ms(&caps, 5);
        validate_cue(block_index, start_ms, end_ms)?;

        let mut lines: Vec<String> = Vec::new();
        while let Some(next) = lines_iter.peek() {
            let trimmed = next.trim();
            if trimmed.is_empty() || SUBVIEWER_TIMING_REGEX.is_match(trimmed) {
                break;
            }
            // [br] is SubViewer's explicit line break marker
            lines.extend(trimmed.split("[br]").map(|l| l.trim().to_string()));
            lines_iter.next();
        }

        if lines.iter().all(|l| l.trim().is_empty()) {
            warn!("Skipping cue block {} with no text", block_index);
        } else {
            cues.push(Cue {
                start_ms,
                end_ms,
                lines,
            });
        }
        block_index += 1;
    }

    if cues.is_empty() {
        return Err(ParseError::new(0, "no cue blocks found"));
    }
    Ok(cues)
}
