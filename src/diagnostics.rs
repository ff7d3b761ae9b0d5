use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render a fatal error as valid markdown with bold headings and print to
/// stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and how to fix it.
/// Designed to be readable by both humans and LLM agents.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::CsvWrite { path, reason } => format!("\
# Error: CSV Report Not Written

Could not write `{}`: {reason}

## Fix

Check that the output directory exists and is writable.
", path.display()),

        Error::EmptyTree { root } => format!("\
# Error: Empty Tree

No markdown documents found under `{}`.

## Fix

Point linkcheck at a directory containing `.md` files, and check the
`include`/`exclude` patterns in `.linkcheck.toml` if one exists.
", root.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::RootNotFound { root } => format!("\
# Error: Root Not Found

`{}` does not exist or is not a directory.

## Fix

Pass the documentation content root:

    linkcheck docs/
", root.display()),

        Error::TomlDe(e) => format!("\
# Error: Invalid Config

`.linkcheck.toml` is malformed:

{e}
"),
    }
}
