use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cue::SubtitleFormat;
use crate::errors::CleanError;
use crate::sanitize::{sanitize_line, Dialect};

// @module: File-level clean pass over on-disk subtitle files

fn io_err(path: &Path, source: std::io::Error) -> CleanError {
    CleanError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Markup dialect to strip for a given subtitle format, `None` when the
/// format carries no markup the renderer chokes on
pub fn dialect_for_format(format: SubtitleFormat) -> Option<Dialect> {
    match format {
        SubtitleFormat::SubRip | SubtitleFormat::WebVtt | SubtitleFormat::SubViewer => {
            Some(Dialect::HtmlLike)
        }
        SubtitleFormat::SubStationAlpha => Some(Dialect::OverrideCodes),
        SubtitleFormat::MicroDvd => None,
    }
}

/// Rewrite a subtitle file with all markup of the dialect removed.
///
/// The source is read fully into memory before anything is written, so
/// cleaning a file onto itself (`source == dest`) is safe and never truncates
/// input mid-read. An existing destination is removed first, then the
/// sanitized content is written line by line with a terminator per line.
///
/// A missing source file is a silent no-op; callers that need that surfaced
/// check existence themselves.
pub fn clean_file<P1: AsRef<Path>, P2: AsRef<Path>>(
    source: P1,
    dest: P2,
    dialect: Dialect,
) -> Result<(), CleanError> {
    let source = source.as_ref();
    let dest = dest.as_ref();

    if !source.exists() {
        return Ok(());
    }

    let content = fs::read_to_string(source).map_err(|e| io_err(source, e))?;

    if dest.exists() {
        fs::remove_file(dest).map_err(|e| io_err(dest, e))?;
    }

    let file = File::create(dest).map_err(|e| io_err(dest, e))?;
    let mut writer = BufWriter::new(file);
    for line in content.lines() {
        writeln!(writer, "{}", sanitize_line(line, dialect)).map_err(|e| io_err(dest, e))?;
    }
    writer.flush().map_err(|e| io_err(dest, e))
}
