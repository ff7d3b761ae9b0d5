//! Link extractor: every internal inline link in a document, with the byte
//! span of its raw target so fixes can rewrite it in place.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

use crate::index::Document;
use crate::types::Reference;

/// Inline links with an optional title: `![alt](src)`, `[text](target)`,
/// `[text](target "title")`. The leading bang capture lets image links be
/// skipped without lookbehind. Compiled once; the interactive fixer
/// re-extracts per commit.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?)\[([^\]]*)\]\(\s*([^()\s"]*)(?:\s+"([^")]*)")?\s*\)"#)
        .expect("valid regex")
});

/// Extract every internal link reference from a document's text.
///
/// Image links and scheme-prefixed targets (`http://`, `https://`,
/// `mailto:`, …) are skipped — external URLs belong to the external
/// checker. Targets are split into path and anchor on the first `#` and
/// percent-decoded. Constructs the pattern cannot parse are simply not
/// matched; a malformed link never aborts the scan.
///
/// # Panics
///
/// Panics if the hardcoded link regex is invalid (compile-time invariant).
pub fn extract(document: &Document) -> Vec<Reference> {
    return extract_from(&document.path, &document.text);
}

/// Extract references from raw text under a given document key. Used by
/// the interactive fixer to re-extract against file content that earlier
/// fixes may have shifted.
///
/// # Panics
///
/// Panics on first use if the hardcoded link regex is invalid
/// (compile-time invariant).
pub fn extract_from(source: &str, text: &str) -> Vec<Reference> {
    let mut references = Vec::new();

    let mut offset = 0usize;
    for (line_idx, line) in text.split_inclusive('\n').enumerate() {
        let line_number = u32::try_from(line_idx + 1).unwrap_or(u32::MAX);
        for cap in LINK_PATTERN.captures_iter(line) {
            if let Some(reference) = parse_link_capture(&cap, source, line_number, offset) {
                references.push(reference);
            }
        }
        offset += line.len();
    }

    references
}

/// Whether a target is an external URL (scheme-prefixed).
fn has_url_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    !scheme.is_empty()
        && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// Try to parse a regex capture into an internal link reference.
/// Returns `None` for image links and external URLs.
fn parse_link_capture(
    cap: &Captures<'_>,
    source: &str,
    line: u32,
    line_offset: usize,
) -> Option<Reference> {
    let bang = cap.get(1).map_or("", |m| m.as_str());
    if !bang.is_empty() {
        return None;
    }

    let target_match = cap.get(3)?;
    let raw_target = target_match.as_str();
    if has_url_scheme(raw_target) {
        return None;
    }

    let (raw_path, raw_anchor) = match raw_target.split_once('#') {
        Some((path, anchor)) => (path, Some(anchor)),
        None => (raw_target, None),
    };

    Some(Reference {
        anchor: raw_anchor.map(percent_decode),
        line,
        path: percent_decode(raw_path),
        raw_target: raw_target.to_string(),
        source: source.to_string(),
        span: line_offset + target_match.start()..line_offset + target_match.end(),
        text: cap.get(2).map_or("", |m| m.as_str()).to_string(),
        title: cap.get(4).map(|m| m.as_str().to_string()),
    })
}

/// Decode `%xx` escapes, falling back to the raw text on invalid UTF-8.
fn percent_decode(s: &str) -> String {
    return percent_decode_str(s).decode_utf8_lossy().into_owned();
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn doc(text: &str) -> Document {
        Document {
            anchors: BTreeSet::new(),
            path: "docs/guide.md".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn extracts_path_and_anchor_with_location() {
        let document = doc("intro\n\nSee [setup](./setup.md#install) first.\n");
        let refs = extract(&document);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].line, 3);
        assert_eq!(refs[0].path, "./setup.md");
        assert_eq!(refs[0].anchor.as_deref(), Some("install"));
        assert_eq!(refs[0].raw_target, "./setup.md#install");
        assert_eq!(&document.text[refs[0].span.clone()], "./setup.md#install");
    }

    #[test]
    fn skips_images_and_external_urls() {
        let document = doc(
            "![logo](images/logo.png)\n\
             [site](https://example.com/page)\n\
             [mail](mailto:docs@example.com)\n\
             [ok](page.md)\n",
        );
        let refs = extract(&document);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].path, "page.md");
    }

    #[test]
    fn pure_anchor_target_has_empty_path() {
        let refs = extract(&doc("jump to [usage](#usage)\n"));
        assert_eq!(refs.len(), 1);
        assert!(refs[0].path.is_empty());
        assert_eq!(refs[0].anchor.as_deref(), Some("usage"));
    }

    #[test]
    fn empty_target_has_empty_path_and_no_anchor() {
        let refs = extract(&doc("dangling []() link\n"));
        assert_eq!(refs.len(), 1);
        assert!(refs[0].path.is_empty());
        assert!(refs[0].anchor.is_none());
    }

    #[test]
    fn splits_on_first_hash_only() {
        let refs = extract(&doc("[x](a.md#b#c)\n"));
        assert_eq!(refs[0].path, "a.md");
        assert_eq!(refs[0].anchor.as_deref(), Some("b#c"));
    }

    #[test]
    fn percent_encoded_targets_are_decoded() {
        let refs = extract(&doc("[x](my%20page.md#some%2Dslug)\n"));
        assert_eq!(refs[0].path, "my page.md");
        assert_eq!(refs[0].anchor.as_deref(), Some("some-slug"));
        assert_eq!(refs[0].raw_target, "my%20page.md#some%2Dslug");
    }

    #[test]
    fn existing_title_is_captured() {
        let refs = extract(&doc("[x](page.md \"already titled\")\n"));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].path, "page.md");
        assert_eq!(refs[0].title.as_deref(), Some("already titled"));
        assert_eq!(&refs[0].raw_target, "page.md");
    }

    #[test]
    fn multiple_links_on_one_line_keep_distinct_spans() {
        let document = doc("[a](a.md) and [b](b.md)\n");
        let refs = extract(&document);
        assert_eq!(refs.len(), 2);
        assert_eq!(&document.text[refs[0].span.clone()], "a.md");
        assert_eq!(&document.text[refs[1].span.clone()], "b.md");
        assert!(refs[0].span.end <= refs[1].span.start);
    }

    #[test]
    fn scheme_detection_only_matches_scheme_prefixes() {
        assert!(has_url_scheme("https://x"));
        assert!(has_url_scheme("mailto:someone"));
        assert!(!has_url_scheme("notes.md"));
        assert!(!has_url_scheme("#anchor"));
        assert!(!has_url_scheme("dir/page.md"));
    }
}
