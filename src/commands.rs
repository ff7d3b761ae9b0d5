//! The linkcheck pipeline: build the index once, extract and validate
//! per document, compute suggestions for broken references, then render
//! a report or fix interactively.

use std::io::{BufRead, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::error::Error;
use crate::fixer;
use crate::index::DocumentIndex;
use crate::report::{Report, ReportRow};
use crate::scanner;
use crate::suggest;
use crate::types::{Reference, Resolution, Status, Suggestion, ValidationResult};
use crate::validator;

/// Options gathered from the command line.
pub struct RunOptions {
    /// Write a CSV report to this path instead of the terminal report.
    pub csv: Option<PathBuf>,
    /// Prompt to fix each broken reference in place.
    pub interactive: bool,
    /// Suppress progress output.
    pub quiet: bool,
    /// Content root to scan.
    pub root: PathBuf,
}

/// Run the full pipeline.
///
/// Exit code: 0 when the tree is clean (or every interactive fix
/// persisted), 1 when broken references remain or any fix failed to
/// write. Fatal errors propagate to the caller, which exits 2.
///
/// # Errors
///
/// Returns errors from config loading, index building, or CSV writing.
pub fn run(options: &RunOptions) -> Result<ExitCode, Error> {
    let config = Config::load(&options.root)?;
    let index = DocumentIndex::build(&options.root, &config)?;
    let report = check_tree(&index, &config, options.quiet);

    if options.interactive {
        let stdin = std::io::stdin();
        let failed_writes = fix_interactively(&report, &index, &mut stdin.lock());
        if failed_writes > 0 {
            eprintln!("{failed_writes} fix(es) could not be written");
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(csv_path) = &options.csv {
        std::fs::write(csv_path, report.render_csv()).map_err(|e| Error::CsvWrite {
            path: csv_path.clone(),
            reason: e.to_string(),
        })?;
        eprintln!("CSV report written to {}", csv_path.display());
    } else {
        print!("{}", report.render_terminal());
    }

    if report.broken_count() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Extract and validate every document, attaching suggestions to broken
/// results. The index is immutable here, so processing order cannot
/// affect any classification.
fn check_tree(index: &DocumentIndex, config: &Config, quiet: bool) -> Report {
    let total = index.docs.len();
    let mut rows: Vec<ReportRow> = Vec::new();

    for (position, document) in index.docs.values().enumerate() {
        if !quiet {
            eprint!("\r[{}/{total}] {}\x1b[K", position + 1, document.path);
        }

        for reference in scanner::extract(document) {
            let result = validator::validate(&reference, index);
            if let Some(warning) = &result.warning {
                if !quiet {
                    eprint!("\r\x1b[K");
                }
                eprintln!("warning: {warning}");
            }
            let suggestions = suggestions_for(&result, index, config);
            rows.push(ReportRow { result, suggestions });
        }
    }

    if !quiet {
        eprint!("\r\x1b[K");
    }

    Report::build(rows)
}

/// Compute suggestions for a validation result. `Ok` rows get none;
/// broken links draw from all document paths, broken anchors only from
/// the resolved target document's anchors.
fn suggestions_for(
    result: &ValidationResult,
    index: &DocumentIndex,
    config: &Config,
) -> Vec<Suggestion> {
    match result.status {
        Status::BrokenAnchor => {
            let Some(target) = result.resolved.as_deref().and_then(|key| index.get(key)) else {
                return Vec::new();
            };
            let anchor = result.reference.anchor.as_deref().unwrap_or("");
            suggest::suggest_anchors(anchor, target, config.suggestion_limit, config.min_score)
        },
        Status::BrokenLink => suggest::suggest_paths(
            &result.reference.path,
            result.reference.anchor.as_deref(),
            &result.reference.source,
            index,
            config.suggestion_limit,
            config.min_score,
        ),
        Status::Ok => Vec::new(),
    }
}

/// Walk the broken rows one at a time, prompting for a choice and
/// committing each accepted fix to disk immediately. Interruption leaves
/// already-decided fixes persisted and the rest untouched.
///
/// Returns the number of fixes that could not be written. EOF on `input`
/// ends the session.
fn fix_interactively<R: BufRead>(
    report: &Report,
    index: &DocumentIndex,
    input: &mut R,
) -> u32 {
    let mut failed_writes = 0u32;

    for row in report.broken_rows() {
        let reference = &row.result.reference;
        let label = match row.result.status {
            Status::BrokenAnchor => "Broken anchor",
            _ => "Broken link",
        };

        println!();
        println!("File: {}:{}", reference.source, reference.line);
        println!("  {label}: {}", reference.raw_target);

        if row.suggestions.is_empty() {
            println!("  No suggestions available. Skipping.");
            continue;
        }
        println!("  Suggestions:");
        for (idx, suggestion) in row.suggestions.iter().enumerate() {
            println!("    {}. {} ({:.1}%)", idx + 1, suggestion.value, suggestion.score * 100.0);
        }

        let Some(resolution) = prompt_for_resolution(row, input) else {
            // EOF: stop prompting, keep what was already committed.
            return failed_writes;
        };
        if matches!(resolution, Resolution::Skip) {
            continue;
        }
        if !commit_fix(index, row, &resolution) {
            failed_writes += 1;
        }
    }

    failed_writes
}

/// Read choices until one is valid. `None` on EOF or input error.
fn prompt_for_resolution<R: BufRead>(row: &ReportRow, input: &mut R) -> Option<Resolution> {
    loop {
        print!("  Choose a fix (1-{}), s to skip, or f to flag: ", row.suggestions.len());
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {},
        }

        match line.trim().to_lowercase().as_str() {
            "s" => return Some(Resolution::Skip),
            "f" => return Some(Resolution::Flag),
            choice => {
                if let Some(picked) = choice
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=row.suggestions.len()).contains(n))
                    .and_then(|n| row.suggestions.get(n - 1))
                {
                    return Some(Resolution::Replace(replacement_target(row, picked)));
                }
            },
        }
    }
}

/// Build the new raw target for a chosen suggestion. Path suggestions are
/// already complete relative targets; anchor suggestions keep the path
/// portion exactly as written and swap the fragment.
fn replacement_target(row: &ReportRow, suggestion: &Suggestion) -> String {
    match row.result.status {
        Status::BrokenAnchor => {
            let raw = row.result.reference.raw_target.as_str();
            let base = raw.split_once('#').map_or(raw, |(path, _)| path);
            format!("{base}#{}", suggestion.value)
        },
        _ => suggestion.value.clone(),
    }
}

/// Commit one fix: re-read the file, re-locate the reference in the
/// current content (earlier fixes may have shifted its span), rewrite in
/// a single pass, and write back. Returns false when the file could not
/// be read or written; other documents are unaffected either way.
fn commit_fix(index: &DocumentIndex, row: &ReportRow, resolution: &Resolution) -> bool {
    let reference = &row.result.reference;
    let path = index.root.join(&reference.source);

    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("  error reading {}: {e}", path.display());
            return false;
        },
    };

    // Match on the original title as well as the target, so a document
    // with several identical broken links fixes each occurrence in turn:
    // a just-flagged occurrence gains a title and stops matching.
    let live_refs = scanner::extract_from(&reference.source, &text);
    let candidates: Vec<&Reference> = live_refs
        .iter()
        .filter(|r| r.raw_target == reference.raw_target && r.title == reference.title)
        .collect();
    let Some(live) = candidates
        .iter()
        .find(|r| r.line == reference.line)
        .copied()
        .or_else(|| candidates.first().copied())
    else {
        println!("  reference no longer present, skipping");
        return true;
    };

    let Some(edit) = fixer::edit_for(&live, row.result.status, resolution) else {
        println!("  link already has a title, skipping flag");
        return true;
    };

    let fixed = fixer::apply_edits(&text, vec![edit]);
    match std::fs::write(&path, fixed) {
        Ok(()) => {
            println!("  updated {}", reference.source);
            true
        },
        Err(e) => {
            eprintln!("  error writing {}: {e}", path.display());
            false
        },
    }
}
