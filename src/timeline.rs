use serde::{Deserialize, Serialize};

use crate::cue::CueList;
use crate::errors::SynthesisError;

// @module: Keyframe timeline synthesis

/// Node path targeted by every synthesized track
pub const TRACK_NODE_PATH: &str = "Subtitle";

/// Property targeted by every synthesized track
pub const TRACK_PROPERTY: &str = "Text";

/// One (time, value) pair on a track.
///
/// A `None` value means "clear the displayed text".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time of the value change in seconds
    pub time_s: f64,

    /// Text to display from this time on, or `None` to display nothing
    pub value: Option<String>,
}

/// Ordered keyframe sequence targeting one property of one display node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Path of the display node the track drives
    pub node_path: String,

    /// Property of the node the track drives
    pub property: String,

    /// Keyframes with non-decreasing `time_s`
    pub keyframes: Vec<Keyframe>,
}

/// Complete synthesized output for one subtitle file.
///
/// Constructed once by [`synthesize`] and handed off immutably to the scene
/// host; the core never mutates a timeline after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// End time of the last cue, in seconds
    pub total_duration_s: f64,

    /// The single text track driving the subtitle display
    pub track: Track,
}

// Same divisor for keyframe times and total duration, so the trailing blank
// keyframe never lands past the declared duration.
fn ms_to_s(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Convert an ordered cue list into a continuous keyframe timeline.
///
/// The target renderer has no notion of a cue ending, only of a value
/// changing at a point in time, so every display gap becomes an explicit
/// blank keyframe:
/// - a leading blank keyframe at 0 when the first cue starts later,
/// - a gap-closing blank keyframe after each cue followed by silence,
/// - a trailing blank keyframe so the last text does not persist forever.
///
/// Back-to-back cues produce no intermediate blank, the next text keyframe
/// alone performs the transition. Overlapping cues are not reconciled: the
/// later keyframe overwrites the displayed text at its own start time, and
/// gap handling keeps comparing against the running previous end.
///
/// Cues must be sorted ascending by start time; the parser preserves file
/// order and well-formed files are pre-sorted.
pub fn synthesize(cues: CueList) -> Result<Timeline, SynthesisError> {
    let Some(first) = cues.first() else {
        return Err(SynthesisError::EmptyInput);
    };

    let mut keyframes = Vec::with_capacity(cues.len() * 2 + 1);

    let mut prev_end_ms = first.start_ms;
    if prev_end_ms != 0 {
        // track starts clear instead of jumping straight to the first text
        keyframes.push(Keyframe {
            time_s: 0.0,
            value: None,
        });
    }

    for cue in cues {
        if cue.start_ms > prev_end_ms {
            // close the previous cue's display window over the silent gap
            keyframes.push(Keyframe {
                time_s: ms_to_s(prev_end_ms),
                value: None,
            });
        }

        keyframes.push(Keyframe {
            time_s: ms_to_s(cue.start_ms),
            value: Some(cue.lines.join("\n")),
        });
        prev_end_ms = cue.end_ms;
    }

    // clear the last cue's text
    keyframes.push(Keyframe {
        time_s: ms_to_s(prev_end_ms),
        value: None,
    });

    Ok(Timeline {
        total_duration_s: ms_to_s(prev_end_ms),
        track: Track {
            node_path: TRACK_NODE_PATH.to_string(),
            property: TRACK_PROPERTY.to_string(),
            keyframes,
        },
    })
}
