//! Fix applier: pending edits collected per document and applied in a
//! single rewrite pass, so earlier edits never skew later offsets.

use crate::types::{Reference, Resolution, Status};

/// A pending text edit: replace `span` with `insert`. An insertion is a
/// zero-width span.
#[derive(Debug, Clone)]
pub struct Edit {
    /// Replacement text.
    pub insert: String,
    /// Byte range in the document text to replace.
    pub span: std::ops::Range<usize>,
}

/// Translate a resolution for one reference into a pending edit.
///
/// `Replace` rewrites the raw target span. `Flag` appends the status label
/// as the link's title immediately after the target, but only when the
/// link has no title yet — an existing title is never duplicated or
/// corrupted. `Skip` produces no edit.
pub fn edit_for(reference: &Reference, status: Status, resolution: &Resolution) -> Option<Edit> {
    match resolution {
        Resolution::Flag => {
            if reference.title.is_some() {
                return None;
            }
            Some(Edit {
                insert: format!(" \"{}\"", status.label()),
                span: reference.span.end..reference.span.end,
            })
        },
        Resolution::Replace(new_target) => Some(Edit {
            insert: new_target.clone(),
            span: reference.span.clone(),
        }),
        Resolution::Skip => None,
    }
}

/// Apply all pending edits for one document in a single pass.
///
/// Edits are applied back-to-front so each span, captured against the
/// original text, stays valid. All unrelated bytes are preserved exactly.
pub fn apply_edits(text: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.span.start.cmp(&a.span.start));

    let mut out = text.to_string();
    for edit in edits {
        if edit.span.end <= out.len() {
            out.replace_range(edit.span, &edit.insert);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    fn reference_in(text: &str, raw_target: &str, title: Option<&str>) -> Reference {
        let start = text.find(raw_target).unwrap();
        Reference {
            anchor: None,
            line: 1,
            path: raw_target.to_string(),
            raw_target: raw_target.to_string(),
            source: "guide.md".to_string(),
            span: start..start + raw_target.len(),
            text: "bad".to_string(),
            title: title.map(String::from),
        }
    }

    #[test]
    fn flag_appends_title_after_target() {
        let text = "before [bad](./missing.md) after\n";
        let reference = reference_in(text, "./missing.md", None);
        let edit = edit_for(&reference, Status::BrokenLink, &Resolution::Flag).unwrap();
        let fixed = apply_edits(text, vec![edit]);
        assert_eq!(fixed, "before [bad](./missing.md \"BROKEN_LINK\") after\n");
    }

    #[test]
    fn flag_never_duplicates_an_existing_title() {
        let text = "[bad](./missing.md \"already\")\n";
        let reference = reference_in(text, "./missing.md", Some("already"));
        assert!(edit_for(&reference, Status::BrokenLink, &Resolution::Flag).is_none());
    }

    #[test]
    fn replace_rewrites_only_the_target() {
        let text = "see [setup](./setup.md#install) now\n";
        let reference = reference_in(text, "./setup.md#install", None);
        let resolution = Resolution::Replace("./setup.md#installation".to_string());
        let edit = edit_for(&reference, Status::BrokenAnchor, &resolution).unwrap();
        let fixed = apply_edits(text, vec![edit]);
        assert_eq!(fixed, "see [setup](./setup.md#installation) now\n");
    }

    #[test]
    fn skip_leaves_text_byte_identical() {
        let text = "a [x](gone.md) b\n";
        let reference = reference_in(text, "gone.md", None);
        assert!(edit_for(&reference, Status::BrokenLink, &Resolution::Skip).is_none());
        assert_eq!(apply_edits(text, Vec::new()), text);
    }

    #[test]
    fn multiple_edits_apply_without_offset_drift() {
        let text = "[a](one.md) mid [b](two.md)\n";
        let first = reference_in(text, "one.md", None);
        let second = reference_in(text, "two.md", None);
        let edits = vec![
            edit_for(&first, Status::BrokenLink, &Resolution::Replace("1.md".to_string()))
                .unwrap(),
            edit_for(&second, Status::BrokenLink, &Resolution::Flag).unwrap(),
        ];
        let fixed = apply_edits(text, edits);
        assert_eq!(fixed, "[a](1.md) mid [b](two.md \"BROKEN_LINK\")\n");
    }
}
