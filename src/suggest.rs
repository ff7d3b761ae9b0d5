//! Fuzzy suggester: rank candidate paths or anchors by normalized string
//! similarity for each broken reference.

use crate::index::{Document, DocumentIndex};
use crate::types::Suggestion;

/// Normalized similarity between two strings: `rapidfuzz` ratio, already
/// in `[0, 1]`. Symmetric by construction.
pub fn score(a: &str, b: &str) -> f64 {
    return rapidfuzz::fuzz::ratio(a.chars(), b.chars());
}

/// Suggest replacement paths for a broken path, drawn from every document
/// in the index.
///
/// Each suggestion is re-expressed relative to the referencing document's
/// directory so it can be applied verbatim. When the broken reference
/// carried an anchor, the best-matching anchor of the suggested document
/// is appended (`path#anchor`). Returns an empty list when the index has
/// no candidates above `min_score`.
pub fn suggest_paths(
    broken_path: &str,
    anchor: Option<&str>,
    source: &str,
    index: &DocumentIndex,
    limit: usize,
    min_score: f64,
) -> Vec<Suggestion> {
    let ranked = rank(broken_path, index.docs.keys().map(String::as_str), limit, min_score);

    ranked
        .into_iter()
        .map(|suggestion| {
            let mut value = relative_to(source, &suggestion.value);
            if let Some(anchor) = anchor {
                let target = index.get(&suggestion.value);
                let best = target
                    .map(|doc| suggest_anchors(anchor, doc, 1, 0.0))
                    .unwrap_or_default();
                if let Some(best_anchor) = best.first() {
                    value = format!("{value}#{}", best_anchor.value);
                }
            }
            Suggestion { score: suggestion.score, value }
        })
        .collect()
}

/// Suggest replacement anchors for a broken anchor, drawn only from the
/// target document's own anchor set. Returns an empty list when the
/// document has no anchors above `min_score`.
pub fn suggest_anchors(
    broken_anchor: &str,
    target: &Document,
    limit: usize,
    min_score: f64,
) -> Vec<Suggestion> {
    return rank(broken_anchor, target.anchors.iter().map(String::as_str), limit, min_score);
}

/// Score all candidates and keep the top `limit`.
///
/// Ordering is deterministic: descending score, then shorter candidate,
/// then lexical. Scores below `min_score` are dropped (`0.0` keeps all).
fn rank<'a>(
    broken: &str,
    candidates: impl Iterator<Item = &'a str>,
    limit: usize,
    min_score: f64,
) -> Vec<Suggestion> {
    let mut scored: Vec<Suggestion> = candidates
        .map(|candidate| Suggestion { score: score(broken, candidate), value: candidate.to_string() })
        .filter(|s| s.score >= min_score)
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.value.len().cmp(&b.value.len()))
            .then_with(|| a.value.cmp(&b.value))
    });
    scored.truncate(limit);
    scored
}

/// Re-express an index key relative to the referencing document's directory.
fn relative_to(source: &str, target: &str) -> String {
    let source_dir = match source.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    };

    let mut from: Vec<&str> = if source_dir.is_empty() {
        Vec::new()
    } else {
        source_dir.split('/').collect()
    };
    let mut to: Vec<&str> = target.split('/').collect();

    while !from.is_empty() && !to.is_empty() && from.first() == to.first() {
        from.remove(0);
        to.remove(0);
    }

    let mut parts: Vec<String> = from.iter().map(|_| "..".to_string()).collect();
    parts.extend(to.into_iter().map(String::from));
    parts.join("/")
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::PathBuf;

    fn doc_with_anchors(path: &str, anchors: &[&str]) -> Document {
        Document {
            anchors: anchors.iter().map(|a| (*a).to_string()).collect(),
            path: path.to_string(),
            text: String::new(),
        }
    }

    fn index_of(docs: Vec<Document>) -> DocumentIndex {
        let mut map = BTreeMap::new();
        for d in docs {
            map.insert(d.path.clone(), d);
        }
        DocumentIndex { assets: BTreeSet::new(), docs: map, root: PathBuf::from(".") }
    }

    #[test]
    fn score_is_symmetric_and_bounded() {
        let pairs = [("install", "installation"), ("", "x"), ("same", "same")];
        for (a, b) in pairs {
            let forward = score(a, b);
            let backward = score(b, a);
            assert!((forward - backward).abs() < 1e-9);
            assert!((0.0..=1.0).contains(&forward));
        }
        assert!((score("same", "same") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn close_anchor_ranks_first_with_high_score() {
        let doc = doc_with_anchors("setup.md", &["installation", "usage", "license"]);
        let suggestions = suggest_anchors("install", &doc, 3, 0.0);
        assert_eq!(suggestions[0].value, "installation");
        assert!(suggestions[0].score > 0.5);
    }

    #[test]
    fn min_score_filters_and_zero_keeps_all() {
        let doc = doc_with_anchors("setup.md", &["installation", "zzz"]);
        let all = suggest_anchors("install", &doc, 5, 0.0);
        let filtered = suggest_anchors("install", &doc, 5, 0.5);
        assert_eq!(all.len(), 2);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].value, "installation");
    }

    #[test]
    fn empty_candidate_set_yields_empty_suggestions() {
        let doc = doc_with_anchors("setup.md", &[]);
        assert!(suggest_anchors("install", &doc, 3, 0.0).is_empty());
    }

    #[test]
    fn ties_break_shorter_then_lexical() {
        // Equal-length candidates equidistant from the query sort lexically.
        let doc = doc_with_anchors("setup.md", &["ab", "ba", "aa"]);
        let suggestions = suggest_anchors("ab", &doc, 3, 0.0);
        assert_eq!(suggestions[0].value, "ab");
        let tied: Vec<&str> = suggestions[1..].iter().map(|s| s.value.as_str()).collect();
        assert_eq!(tied, vec!["aa", "ba"]);
    }

    #[test]
    fn path_suggestions_are_relative_to_source_dir() {
        let index = index_of(vec![
            doc_with_anchors("setup.md", &[]),
            doc_with_anchors("docs/guide.md", &[]),
        ]);
        let suggestions =
            suggest_paths("./setup.md", None, "docs/guide.md", &index, 1, 0.0);
        assert_eq!(suggestions[0].value, "../setup.md");
    }

    #[test]
    fn path_suggestion_completes_anchor_when_requested() {
        let index = index_of(vec![
            doc_with_anchors("setup.md", &["installation"]),
            doc_with_anchors("guide.md", &[]),
        ]);
        let suggestions =
            suggest_paths("setup.md", Some("install"), "guide.md", &index, 1, 0.0);
        assert_eq!(suggestions[0].value, "setup.md#installation");
    }

    #[test]
    fn relative_to_walks_up_shared_prefix() {
        assert_eq!(relative_to("docs/a/guide.md", "docs/b/setup.md"), "../b/setup.md");
        assert_eq!(relative_to("guide.md", "setup.md"), "setup.md");
        assert_eq!(relative_to("docs/guide.md", "docs/setup.md"), "setup.md");
    }
}
