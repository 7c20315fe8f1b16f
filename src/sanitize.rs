use once_cell::sync::Lazy;
use regex::Regex;

// @module: Markup sanitization for cue text

// @const: HTML-like start tag, e.g. <font color="red"> or < i >
static HTML_START_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*[A-Za-z][^>]*>").unwrap()
});

// @const: HTML-like end tag, e.g. </font> or </ b >
static HTML_END_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</\s*[A-Za-z][A-Za-z0-9]*\s*>").unwrap()
});

// @const: Brace-delimited override code, e.g. {\an8} or {\pos(400,570)}
static OVERRIDE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\\[^}]+\}").unwrap()
});

/// Markup-removal ruleset to apply to a line of cue text.
///
/// Display-hint tags the target renderer cannot interpret come in two
/// families: HTML-like tags used by SubRip/WebVTT style captions, and
/// brace-delimited override codes used by SubStation Alpha scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Removes paired `<tag ...>` / `</tag>` markup
    HtmlLike,
    /// Removes `{\...}` inline override codes
    OverrideCodes,
}

/// Remove all markup regions matching the dialect from a single line.
///
/// Characters outside matched regions are preserved byte-for-byte, including
/// non-ASCII text. Sanitizing already-sanitized text is a no-op, so the
/// file-level clean pass can safely be invoked on its own output.
pub fn sanitize_line(line: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::HtmlLike => {
            let without_end = HTML_END_TAG_REGEX.replace_all(line, "");
            HTML_START_TAG_REGEX.replace_all(&without_end, "").into_owned()
        }
        Dialect::OverrideCodes => OVERRIDE_CODE_REGEX.replace_all(line, "").into_owned(),
    }
}
