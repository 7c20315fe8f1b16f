/*!
 * Tests for markup sanitization
 */

use subanim::sanitize::{sanitize_line, Dialect};

/// Test removal of paired font tags
#[test]
fn test_sanitize_line_withFontTags_shouldRemoveBothTags() {
    let line = "<font color=red>Hi</font>";
    assert_eq!(sanitize_line(line, Dialect::HtmlLike), "Hi");
}

/// Test tag attributes are discarded with the tag, not reflowed into the text
#[test]
fn test_sanitize_line_withAttributedTag_shouldDiscardAttributes() {
    let line = "<font face=\"Arial\" size=\"12\">styled</font> plain";
    assert_eq!(sanitize_line(line, Dialect::HtmlLike), "styled plain");
}

/// Test whitespace tolerance around tag names
#[test]
fn test_sanitize_line_withWhitespaceInTags_shouldStillMatch() {
    let line = "< font color=blue>text</ font >";
    assert_eq!(sanitize_line(line, Dialect::HtmlLike), "text");
}

/// Test multiple non-overlapping tags on one line
#[test]
fn test_sanitize_line_withRepeatedTags_shouldRemoveAllMatches() {
    let line = "<i>one</i> and <b>two</b>";
    assert_eq!(sanitize_line(line, Dialect::HtmlLike), "one and two");
}

/// Test removal of SSA override codes
#[test]
fn test_sanitize_line_withOverrideCode_shouldRemoveCode() {
    let line = "{\\an8}Hi";
    assert_eq!(sanitize_line(line, Dialect::OverrideCodes), "Hi");
}

/// Test several override codes embedded mid-line
#[test]
fn test_sanitize_line_withMultipleOverrideCodes_shouldRemoveAll() {
    let line = "{\\i1}slanted{\\i0} and {\\pos(400,570)}placed";
    assert_eq!(sanitize_line(line, Dialect::OverrideCodes), "slanted and placed");
}

/// Test plain braces without a backslash survive the override dialect
#[test]
fn test_sanitize_line_withPlainBraces_shouldKeepThem() {
    let line = "set {a, b} stays";
    assert_eq!(sanitize_line(line, Dialect::OverrideCodes), "set {a, b} stays");
}

/// Test characters outside matched regions are untouched, non-ASCII included
#[test]
fn test_sanitize_line_withNonAsciiText_shouldPreserveIt() {
    let line = "<font color=\"#fff\">こんにちは</font> — наёмник";
    assert_eq!(sanitize_line(line, Dialect::HtmlLike), "こんにちは — наёмник");
}

/// Test idempotence for both dialects, markup or not
#[test]
fn test_sanitize_line_appliedTwice_shouldBeIdempotent() {
    let inputs = [
        "<font color=red>Hi</font>",
        "{\\an8}Hi",
        "no markup here",
        "",
    ];

    for input in inputs {
        for dialect in [Dialect::HtmlLike, Dialect::OverrideCodes] {
            let once = sanitize_line(input, dialect);
            let twice = sanitize_line(&once, dialect);
            assert_eq!(once, twice, "sanitize not idempotent for {:?} on {:?}", dialect, input);
        }
    }
}

/// Test an unterminated tag is left alone rather than eaten to end of line
#[test]
fn test_sanitize_line_withUnclosedAngleBracket_shouldKeepText() {
    let line = "2 < 3 and 5 > 4";
    assert_eq!(sanitize_line(line, Dialect::HtmlLike), "2 < 3 and 5 > 4");
}
