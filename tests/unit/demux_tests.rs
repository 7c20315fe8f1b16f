/*!
 * Tests for demuxer track metadata handling
 *
 * The subprocess paths need a real ffmpeg install and media fixtures, so
 * these tests cover the pure parts: codec classification and track labels.
 */

use subanim::cue::SubtitleFormat;
use subanim::demux::{track_label, SubtitleTrackInfo};

fn track(codec: &str, language: Option<&str>, title: Option<&str>) -> SubtitleTrackInfo {
    SubtitleTrackInfo {
        index: 2,
        codec_name: codec.to_string(),
        language: language.map(|s| s.to_string()),
        title: title.map(|s| s.to_string()),
    }
}

/// Test bitmap codecs are recognized as unconvertible
#[test]
fn test_is_bitmap_withKnownCodecs_shouldClassifyCorrectly() {
    assert!(track("hdmv_pgs_subtitle", None, None).is_bitmap());
    assert!(track("dvd_subtitle", None, None).is_bitmap());
    assert!(track("dvb_subtitle", None, None).is_bitmap());
    assert!(track("xsub", None, None).is_bitmap());
    assert!(!track("subrip", None, None).is_bitmap());
    assert!(!track("ass", None, None).is_bitmap());
}

/// Test extraction format follows the codec where supported
#[test]
fn test_extraction_format_withTextCodecs_shouldMatchCodec() {
    assert_eq!(track("ass", None, None).extraction_format(), SubtitleFormat::SubStationAlpha);
    assert_eq!(track("webvtt", None, None).extraction_format(), SubtitleFormat::WebVtt);
    assert_eq!(track("subrip", None, None).extraction_format(), SubtitleFormat::SubRip);
}

/// Test unknown text codecs fall back to SubRip extraction
#[test]
fn test_extraction_format_withUnknownCodec_shouldFallBackToSubRip() {
    assert_eq!(track("mov_text", None, None).extraction_format(), SubtitleFormat::SubRip);
}

/// Test the track title wins over the language for labeling
#[test]
fn test_track_label_withTitle_shouldUseTitle() {
    let label = track_label(0, &track("subrip", Some("en"), Some("Director Commentary")));
    assert_eq!(label, "0 - Director Commentary");
}

/// Test the language display name is used when there is no title
#[test]
fn test_track_label_withoutTitle_shouldUseLanguageName() {
    let label = track_label(1, &track("subrip", Some("fre"), None));
    assert_eq!(label, "1 - French");
}

/// Test unlabeled tracks still get a usable name
#[test]
fn test_track_label_withoutAnyMetadata_shouldFallBackToUnknown() {
    let label = track_label(3, &track("subrip", None, None));
    assert_eq!(label, "3 - unknown");
}

/// Test characters invalid in file names are replaced with spaces
#[test]
fn test_track_label_withInvalidFilenameChars_shouldReplaceWithSpaces() {
    let label = track_label(0, &track("subrip", None, Some("Signs/Songs: Part?")));
    assert_eq!(label, "0 - Signs Songs  Part ");
    assert!(!label.contains('/'));
    assert!(!label.contains(':'));
    assert!(!label.contains('?'));
}

/// Test unrecognized language codes fall back to the raw code
#[test]
fn test_track_label_withBogusLanguageCode_shouldKeepRawCode() {
    let label = track_label(2, &track("subrip", Some("zz"), None));
    assert_eq!(label, "2 - zz");
}
