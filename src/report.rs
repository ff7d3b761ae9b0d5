//! Report structure shared by the terminal and CSV renderings. Both
//! iterate the same row sequence, so their row order is identical.

use std::fmt::Write as _;

use crate::types::{Status, Suggestion, ValidationResult};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const BLUE: &str = "\x1b[94m";
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const CYAN: &str = "\x1b[96m";
const MAGENTA: &str = "\x1b[95m";

/// One validated reference with the suggestions computed for it.
/// Suggestions are empty for `Ok` rows.
pub struct ReportRow {
    /// The validation outcome.
    pub result: ValidationResult,
    /// Ranked fix candidates for broken rows.
    pub suggestions: Vec<Suggestion>,
}

/// All validation results, grouped by status (broken links first, then
/// broken anchors, then ok) with document-then-line order inside each
/// group.
pub struct Report {
    /// Rows in final render order.
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Sort rows into deterministic render order.
    pub fn build(mut rows: Vec<ReportRow>) -> Self {
        rows.sort_by(|a, b| {
            group_rank(a.result.status)
                .cmp(&group_rank(b.result.status))
                .then_with(|| a.result.reference.source.cmp(&b.result.reference.source))
                .then_with(|| a.result.reference.line.cmp(&b.result.reference.line))
                .then_with(|| a.result.reference.span.start.cmp(&b.result.reference.span.start))
        });
        Self { rows }
    }

    /// Number of broken rows (links plus anchors).
    pub fn broken_count(&self) -> usize {
        return self.rows.iter().filter(|r| r.result.status != Status::Ok).count();
    }

    /// Rows with a non-ok status, in render order.
    pub fn broken_rows(&self) -> impl Iterator<Item = &ReportRow> {
        return self.rows.iter().filter(|r| r.result.status != Status::Ok);
    }

    /// Render the CSV report: a header plus one row per validation result,
    /// with the top suggestion and its score for broken rows.
    pub fn render_csv(&self) -> String {
        let mut out = String::from("document,line,status,target,suggestion,score\n");
        for row in &self.rows {
            let reference = &row.result.reference;
            let (suggestion, score) = match row.suggestions.first() {
                Some(top) => (top.value.as_str(), format!("{:.3}", top.score)),
                None => ("", String::new()),
            };
            let _ = writeln!(
                out,
                "{},{},{},{},{},{}",
                csv_field(&reference.source),
                reference.line,
                row.result.status.label(),
                csv_field(&reference.raw_target),
                csv_field(suggestion),
                score,
            );
        }
        out
    }

    /// Render the human-readable terminal report.
    pub fn render_terminal(&self) -> String {
        let mut out = String::new();

        let broken_links: Vec<&ReportRow> =
            self.broken_rows().filter(|r| r.result.status == Status::BrokenLink).collect();
        let broken_anchors: Vec<&ReportRow> =
            self.broken_rows().filter(|r| r.result.status == Status::BrokenAnchor).collect();

        if broken_links.is_empty() {
            out.push_str(&format!("{GREEN}No broken file links found.{RESET}\n\n"));
        } else {
            out.push_str(&format!("{BOLD}Broken file links:{RESET}\n\n"));
            for row in &broken_links {
                render_broken_row(&mut out, row, YELLOW);
            }
        }

        if broken_anchors.is_empty() {
            out.push_str(&format!("{GREEN}No broken anchors found.{RESET}\n"));
        } else {
            out.push_str(&format!("{BOLD}Broken anchors:{RESET}\n\n"));
            for row in &broken_anchors {
                render_broken_row(&mut out, row, MAGENTA);
            }
        }

        let ok_count = self.rows.len() - self.broken_count();
        let _ = write!(out, "\n{ok_count} ok, {} broken", self.broken_count());
        out.push('\n');
        out
    }
}

/// Render one broken reference with its location and suggestions.
fn render_broken_row(out: &mut String, row: &ReportRow, target_color: &str) {
    let reference = &row.result.reference;
    let _ = writeln!(
        out,
        "{BOLD}File:{RESET} {BLUE}{}{RESET}:{}",
        reference.source, reference.line
    );
    let _ = writeln!(out, "  target: {target_color}{}{RESET}", reference.raw_target);
    if row.suggestions.is_empty() {
        out.push_str("  no suggestions\n");
    } else {
        out.push_str("  suggestions:\n");
        for suggestion in &row.suggestions {
            let _ = writeln!(
                out,
                "    - {CYAN}{}{RESET} ({:.1}%)",
                suggestion.value,
                suggestion.score * 100.0
            );
        }
    }
    out.push('\n');
}

/// Status group order: broken links, broken anchors, ok.
fn group_rank(status: Status) -> u8 {
    return match status {
        Status::BrokenLink => 0,
        Status::BrokenAnchor => 1,
        Status::Ok => 2,
    };
}

/// Quote a CSV field per RFC 4180 when it contains a comma, quote, or
/// newline.
fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        return format!("\"{}\"", field.replace('"', "\"\""));
    }
    field.to_string()
}
