//! Core domain types for linkcheck references, validation results, and
//! suggestions.

use std::ops::Range;

/// Parsed from markdown inline-link syntax by the scanner.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Anchor component of the target, percent-decoded. `None` when the
    /// target carries no `#`. Split on the first `#`; everything after it
    /// is the anchor.
    pub anchor: Option<String>,
    /// One-based line number of the link in the source document.
    pub line: u32,
    /// Path component of the target, percent-decoded. Empty for
    /// same-document targets (`#foo`, `[]()`).
    pub path: String,
    /// Target text exactly as written between the parentheses.
    pub raw_target: String,
    /// Owning document key (normalized path relative to the content root).
    pub source: String,
    /// Byte range of `raw_target` within the owning document's text.
    pub span: Range<usize>,
    /// Link text between the brackets.
    pub text: String,
    /// Existing title attribute (`[x](y "title")`), if any.
    pub title: Option<String>,
}

/// Classification of a single reference against the document index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Target document exists but the requested anchor is not in its anchor set.
    BrokenAnchor,
    /// Target document does not exist in the index.
    BrokenLink,
    /// Target document exists and the anchor (if any) exists in it.
    Ok,
}

impl Status {
    /// Stable string form used in CSV rows and flag titles.
    pub fn label(self) -> &'static str {
        return match self {
            Status::BrokenAnchor => "BROKEN_ANCHOR",
            Status::BrokenLink => "BROKEN_LINK",
            Status::Ok => "OK",
        };
    }
}

/// Output of validating one reference against the document index.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// The reference that was validated.
    pub reference: Reference,
    /// Index key of the resolved target document, when one exists.
    /// The owning document itself for same-document references.
    pub resolved: Option<String>,
    /// Classification of the reference.
    pub status: Status,
    /// Resolution ambiguity warning, surfaced to stderr by the caller.
    pub warning: Option<String>,
}

/// A ranked candidate replacement for a broken reference.
///
/// Path suggestions are expressed relative to the referencing document's
/// directory so they can be applied verbatim. Anchor suggestions are bare
/// slugs without the leading `#`.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// Normalized similarity score in `[0, 1]`.
    pub score: f64,
    /// Candidate path or anchor string.
    pub value: String,
}

/// How a broken reference should be resolved during fixing.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Append the status label as the link's title attribute.
    Flag,
    /// Rewrite the raw target to this string.
    Replace(String),
    /// Leave the document untouched.
    Skip,
}
