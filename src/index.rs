//! Document index: every markdown file under the content root with its
//! heading-derived anchor set, built fully before any validation starts.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;

/// One markdown document: its text plus everything link validation needs.
#[derive(Debug, Clone)]
pub struct Document {
    /// Every anchor targetable in this document: heading slugs (suffixed
    /// for uniqueness), custom `{#id}` anchors, and HTML `<a id=...>` ids.
    pub anchors: BTreeSet<String>,
    /// Normalized path relative to the content root, forward slashes.
    pub path: String,
    /// Raw file content.
    pub text: String,
}

/// Result of resolving a link target against the index.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    /// Index key of the matched document, if any candidate matched.
    pub key: Option<String>,
    /// Set when more than one candidate matched the target.
    pub warning: Option<String>,
}

/// Immutable mapping from document path to parsed document, keyed in
/// `BTreeMap` order so every downstream pass is deterministic.
pub struct DocumentIndex {
    /// Non-markdown files under the root, by normalized relative path.
    /// Valid link targets (trees ship images, licenses, sample configs)
    /// but carrying no anchors.
    pub assets: BTreeSet<String>,
    /// All indexed documents keyed by normalized relative path.
    pub docs: BTreeMap<String, Document>,
    /// Absolute content root the index was built from.
    pub root: PathBuf,
}

impl DocumentIndex {
    /// Walk `root` and index every `.md` file that passes the config
    /// filters. Other files are recorded as anchor-less assets so links
    /// to them validate. Unreadable markdown files are warned to stderr
    /// and skipped.
    ///
    /// # Errors
    ///
    /// Returns `Error::RootNotFound` if `root` is not a directory, or
    /// `Error::EmptyTree` if no documents were indexed.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded heading regexes are invalid (compile-time
    /// invariant).
    pub fn build(root: &Path, config: &Config) -> Result<Self, Error> {
        if !root.is_dir() {
            return Err(Error::RootNotFound { root: root.to_path_buf() });
        }

        let heading_pattern = Regex::new(
            r"^(#{1,6})\s+(.+?)(?:\s+\{#([A-Za-z0-9\-_]+)\})?\s*$",
        )
        .expect("valid regex");
        let html_anchor_pattern =
            Regex::new(r#"(?i)<a\s+[^>]*id=["']([A-Za-z0-9\-_]+)["'][^>]*>"#).expect("valid regex");

        let mut assets: BTreeSet<String> = BTreeSet::new();
        let mut docs: BTreeMap<String, Document> = BTreeMap::new();

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let file_path = entry.path();
            let relative = file_path.strip_prefix(root).unwrap_or(file_path);
            let key = relative.to_string_lossy().replace('\\', "/");

            if !file_path.extension().is_some_and(|ext| ext == "md") {
                assets.insert(key);
                continue;
            }
            if !config.should_scan(&key) {
                continue;
            }

            let text = match std::fs::read_to_string(file_path) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("warning: could not read {key}: {e}");
                    continue;
                },
            };

            let document = parse_document(&key, text, &heading_pattern, &html_anchor_pattern);
            docs.insert(key, document);
        }

        if docs.is_empty() {
            return Err(Error::EmptyTree { root: root.to_path_buf() });
        }

        Ok(Self { assets, docs, root: root.to_path_buf() })
    }

    /// Look up a document by its index key.
    pub fn get(&self, key: &str) -> Option<&Document> {
        return self.docs.get(key);
    }

    /// Resolve a link's path component against the index.
    ///
    /// The path is normalized lexically (`./`, `../`, trailing slashes)
    /// against the source document's directory; site-absolute paths
    /// (leading `/`) are taken from the content root. Candidates tried in
    /// order: the exact path, the path with `.md` appended (extensionless
    /// links), and `<path>/README.md` (directory links). More than one
    /// match is flagged as ambiguous; the first candidate wins. When no
    /// document matches, an existing non-markdown file at the exact path
    /// resolves as an anchor-less asset.
    pub fn resolve(&self, source: &str, target_path: &str) -> ResolvedTarget {
        if target_path.is_empty() {
            return ResolvedTarget { key: Some(source.to_string()), warning: None };
        }

        let joined = if let Some(absolute) = target_path.strip_prefix('/') {
            absolute.to_string()
        } else {
            let source_dir = match source.rsplit_once('/') {
                Some((dir, _)) => dir,
                None => "",
            };
            if source_dir.is_empty() {
                target_path.to_string()
            } else {
                format!("{source_dir}/{target_path}")
            }
        };

        let Some(normalized) = normalize_relative(joined.trim_end_matches('/')) else {
            // Escapes the content root; nothing inside the tree can match.
            return ResolvedTarget { key: None, warning: None };
        };

        let candidates = [
            normalized.clone(),
            format!("{normalized}.md"),
            format!("{normalized}/README.md"),
        ];
        let matches: Vec<&String> =
            candidates.iter().filter(|c| self.docs.contains_key(c.as_str())).collect();

        let warning = if matches.len() > 1 {
            let listed =
                matches.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
            Some(format!("ambiguous target `{target_path}` in {source}: matches {listed}"))
        } else {
            None
        };

        let key = matches
            .first()
            .map(|m| (*m).clone())
            .or_else(|| self.assets.contains(&normalized).then(|| normalized.clone()));

        ResolvedTarget { key, warning }
    }
}

/// Collapse `.` and `..` segments in a slash-separated relative path.
/// Returns `None` when `..` would climb above the content root.
fn normalize_relative(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop()?;
            },
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

/// Parse headings and anchors out of a document's text.
fn parse_document(
    key: &str,
    text: String,
    heading_pattern: &Regex,
    html_anchor_pattern: &Regex,
) -> Document {
    let mut anchors: BTreeSet<String> = BTreeSet::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for line in text.lines() {
        if let Some(cap) = heading_pattern.captures(line) {
            let heading_text = cap.get(2).map_or("", |m| m.as_str());
            let slug = match cap.get(3) {
                // Custom anchors are used verbatim and skip duplicate suffixing.
                Some(custom) => custom.as_str().to_string(),
                None => suffixed_slug(slugify(heading_text), &mut seen),
            };
            anchors.insert(slug);
        }
        for cap in html_anchor_pattern.captures_iter(line) {
            if let Some(id) = cap.get(1) {
                anchors.insert(id.as_str().to_string());
            }
        }
    }

    Document { anchors, path: key.to_string(), text }
}

/// Slugify heading text the way common markdown renderers do: lowercase,
/// strip everything but alphanumerics/hyphens/whitespace, collapse
/// whitespace runs to single hyphens, trim leading and trailing hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for ch in text.to_lowercase().chars() {
        if ch.is_whitespace() {
            pending_separator = !slug.is_empty();
        } else if ch.is_alphanumeric() || ch == '-' {
            if pending_separator {
                slug.push('-');
                pending_separator = false;
            }
            slug.push(ch);
        }
    }

    slug.trim_matches('-').to_string()
}

/// Disambiguate duplicate slugs within one document with `-1`, `-2`, …
/// suffixes in order of first appearance.
fn suffixed_slug(base: String, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(base.clone()).or_insert(0);
    let slug = if *count == 0 { base.clone() } else { format!("{base}-{count}") };
    *count += 1;
    slug
}
