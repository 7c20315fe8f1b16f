/*!
 * Tests for the file-level clean pass
 */

use std::fs;
use anyhow::Result;
use subanim::clean::{clean_file, dialect_for_format};
use subanim::cue::SubtitleFormat;
use subanim::sanitize::Dialect;
use crate::common;

/// Test cleaning a marked-up SubRip file into a separate target
#[test]
fn test_clean_file_withMarkup_shouldStripTagsIntoTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_file(&dir, "in.srt", common::MARKED_UP_SRT)?;
    let target = dir.join("out.srt");

    clean_file(&source, &target, Dialect::HtmlLike)?;

    let cleaned = fs::read_to_string(&target)?;
    assert!(!cleaned.contains("<font"));
    assert!(!cleaned.contains("</font>"));
    assert!(cleaned.contains("Hello world"));
    assert!(cleaned.contains("Second entry"));
    // timing lines pass through untouched
    assert!(cleaned.contains("00:00:01,000 --> 00:00:04,000"));
    Ok(())
}

/// Test cleaning a file onto itself is safe
#[test]
fn test_clean_file_withSameSourceAndTarget_shouldCleanInPlace() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let path = common::create_test_file(&dir, "inplace.srt", common::MARKED_UP_SRT)?;

    clean_file(&path, &path, Dialect::HtmlLike)?;

    let cleaned = fs::read_to_string(&path)?;
    assert!(!cleaned.contains("<font"));
    assert!(cleaned.contains("Hello world"));
    Ok(())
}

/// Test in-place cleaning matches the clean-to-copy route byte for byte
#[test]
fn test_clean_file_inPlaceVersusSeparateTarget_shouldProduceSameContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let in_place = common::create_test_file(&dir, "a.srt", common::MARKED_UP_SRT)?;
    let source = common::create_test_file(&dir, "b.srt", common::MARKED_UP_SRT)?;
    let target = dir.join("b-cleaned.srt");

    clean_file(&in_place, &in_place, Dialect::HtmlLike)?;
    clean_file(&source, &target, Dialect::HtmlLike)?;

    assert_eq!(fs::read_to_string(&in_place)?, fs::read_to_string(&target)?);
    Ok(())
}

/// Test cleaning already-clean output changes nothing
#[test]
fn test_clean_file_appliedTwice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let path = common::create_test_file(&dir, "twice.srt", common::MARKED_UP_SRT)?;

    clean_file(&path, &path, Dialect::HtmlLike)?;
    let first = fs::read_to_string(&path)?;

    clean_file(&path, &path, Dialect::HtmlLike)?;
    let second = fs::read_to_string(&path)?;

    assert_eq!(first, second);
    Ok(())
}

/// Test a missing source file is a silent no-op
#[test]
fn test_clean_file_withMissingSource_shouldDoNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = dir.join("does-not-exist.srt");
    let target = dir.join("never-created.srt");

    clean_file(&source, &target, Dialect::HtmlLike)?;

    assert!(!target.exists());
    Ok(())
}

/// Test an existing target file is replaced, not appended to
#[test]
fn test_clean_file_withExistingTarget_shouldReplaceIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_file(&dir, "src.srt", "plain line\n")?;
    let target = common::create_test_file(&dir, "dst.srt", "old content that must go\n")?;

    clean_file(&source, &target, Dialect::HtmlLike)?;

    let result = fs::read_to_string(&target)?;
    assert_eq!(result, "plain line\n");
    Ok(())
}

/// Test every line is re-emitted with a trailing terminator
#[test]
fn test_clean_file_withNoTrailingNewline_shouldTerminateLastLine() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_file(&dir, "n.srt", "one\ntwo")?;
    let target = dir.join("n-out.srt");

    clean_file(&source, &target, Dialect::HtmlLike)?;

    assert_eq!(fs::read_to_string(&target)?, "one\ntwo\n");
    Ok(())
}

/// Test override-code cleaning of script-style files
#[test]
fn test_clean_file_withOverrideCodes_shouldStripCodes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let source = common::create_test_file(&dir, "s.ass", common::SAMPLE_ASS)?;
    let target = dir.join("s-cleaned.ass");

    clean_file(&source, &target, Dialect::OverrideCodes)?;

    let cleaned = fs::read_to_string(&target)?;
    assert!(!cleaned.contains("{\\an8}"));
    assert!(cleaned.contains("First line\\NSecond line"));
    Ok(())
}

/// Test the format-to-dialect mapping used by the import pipeline
#[test]
fn test_dialect_for_format_withAllFormats_shouldMatchMarkupFamily() {
    assert_eq!(dialect_for_format(SubtitleFormat::SubRip), Some(Dialect::HtmlLike));
    assert_eq!(dialect_for_format(SubtitleFormat::WebVtt), Some(Dialect::HtmlLike));
    assert_eq!(dialect_for_format(SubtitleFormat::SubViewer), Some(Dialect::HtmlLike));
    assert_eq!(dialect_for_format(SubtitleFormat::SubStationAlpha), Some(Dialect::OverrideCodes));
    assert_eq!(dialect_for_format(SubtitleFormat::MicroDvd), None);
}
