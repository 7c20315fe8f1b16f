/*!
 * Common test utilities for the subanim test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use subanim::host::SceneHost;
use subanim::timeline::Timeline;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample SubRip file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// Plain SubRip content with a gap between the entries
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

/// SubRip content with font markup the renderer cannot display
pub const MARKED_UP_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
<font color=\"red\">Hello</font> world

2
00:00:05,000 --> 00:00:09,000
Second <i>entry</i>
";

/// WebVTT content with a cue identifier and cue settings
pub const SAMPLE_VTT: &str = "WEBVTT

intro
00:00:01.000 --> 00:00:04.000 align:center
Hello there

00:00:05.000 --> 00:00:09.000
Two
lines
";

/// SSA script with override codes and a forced newline
pub const SAMPLE_ASS: &str = "[Script Info]
Title: Test

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.00,0:00:04.00,Default,,0,0,0,,{\\an8}First line\\NSecond line
Dialogue: 0,0:00:05.00,0:00:09.00,Default,,0,0,0,,Hello, with comma
";

/// MicroDVD content with a declared frame rate of 25 fps
pub const SAMPLE_MICRODVD: &str = "{1}{1}25.0
{25}{100}Hello|world
{150}{200}Again
";

/// SubViewer content with header metadata and [br] markers
pub const SAMPLE_SUBVIEWER: &str = "[INFORMATION]
[TITLE]Test
[END INFORMATION]

00:00:01.00,00:00:04.00
First[br]cue

00:00:05.00,00:00:09.00
Second cue
";

/// Scene host that keeps every attached timeline in memory
#[derive(Default)]
pub struct CollectingHost {
    pub attached: Vec<(String, Timeline)>,
}

impl SceneHost for CollectingHost {
    fn attach(&mut self, label: &str, timeline: Timeline) -> Result<()> {
        self.attached.push((label.to_string(), timeline));
        Ok(())
    }
}
